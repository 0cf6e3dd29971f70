//! Progress observation
//!
//! Engines report how far they have advanced to an optional observer. The
//! observer only watches; counts that matter are returned in the
//! [`PipelineReport`](crate::core::summary::PipelineReport).

use crate::core::summary::Operation;

/// Receives coarse progress notifications from an engine
pub trait ProgressObserver: Send + Sync {
    /// Called after each row; implementations decide whether to act
    fn on_row(&self, operation: Operation, rows_done: u64);

    /// Called once after the last row
    fn on_finish(&self, operation: Operation, rows_done: u64) {
        let _ = (operation, rows_done);
    }
}

/// Logs progress through `tracing` every `interval` rows
#[derive(Debug, Clone)]
pub struct TracingProgress {
    interval: u64,
}

impl TracingProgress {
    pub fn every(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for TracingProgress {
    fn default() -> Self {
        Self::every(100_000)
    }
}

impl ProgressObserver for TracingProgress {
    fn on_row(&self, operation: Operation, rows_done: u64) {
        if rows_done % self.interval == 0 {
            tracing::info!(operation = %operation, rows = rows_done, "Progress");
        }
    }

    fn on_finish(&self, operation: Operation, rows_done: u64) {
        tracing::debug!(operation = %operation, rows = rows_done, "Stage finished");
    }
}

/// Observer that ignores all notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_row(&self, _operation: Operation, _rows_done: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        finished: Mutex<Option<u64>>,
    }

    impl ProgressObserver for Recorder {
        fn on_row(&self, _operation: Operation, _rows_done: u64) {}

        fn on_finish(&self, _operation: Operation, rows_done: u64) {
            *self.finished.lock().unwrap() = Some(rows_done);
        }
    }

    #[test]
    fn test_interval_never_zero() {
        let progress = TracingProgress::every(0);
        progress.on_row(Operation::Generate, 5);
        assert_eq!(progress.interval, 1);
    }

    #[test]
    fn test_custom_observer_finish() {
        let recorder = Recorder::default();
        recorder.on_finish(Operation::Convert, 42);
        assert_eq!(*recorder.finished.lock().unwrap(), Some(42));
    }
}
