//! Logging and observability
//!
//! Structured logging through `tracing`, with an optional JSON file layer.
//!
//! # Example
//!
//! ```no_run
//! use rosterflow::logging::init_logging;
//! use rosterflow::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(rows = 10, "Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a pipeline stage
///
/// # Example
///
/// ```no_run
/// use rosterflow::log_stage_start;
///
/// log_stage_start!("convert", "students_1.xlsx");
/// ```
#[macro_export]
macro_rules! log_stage_start {
    ($stage:expr, $source:expr) => {
        tracing::info!(
            stage = %$stage,
            source = %$source,
            "Starting stage"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use rosterflow::log_error_with_context;
/// use rosterflow::domain::RosterError;
///
/// let error = RosterError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a batch write
///
/// # Example
///
/// ```no_run
/// use rosterflow::log_batch_processing;
///
/// log_batch_processing!(3, 5000);
/// ```
#[macro_export]
macro_rules! log_batch_processing {
    ($batch_number:expr, $rows:expr) => {
        tracing::debug!(
            batch = $batch_number,
            rows = $rows,
            "Writing batch"
        );
    };
}
