//! In-process store
//!
//! Rows live in a vector for the lifetime of the process. Used for dry
//! local runs and as the store in tests.

use crate::adapters::store::traits::{Page, PageRequest, StudentFilter, StudentStore};
use crate::domain::{Result, RosterError, Row};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Row>,
    next_id: i64,
}

/// Mutex-guarded vector with sequential id assignment starting at 1
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| RosterError::Database("memory store lock poisoned".to_string()))
    }

    /// Copy of every stored row, in insertion order
    pub fn snapshot(&self) -> Result<Vec<Row>> {
        Ok(self.lock()?.rows.clone())
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn test_connection(&self) -> Result<()> {
        self.lock().map(|_| ())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_batch(&self, rows: &[Row]) -> Result<usize> {
        let mut inner = self.lock()?;
        for row in rows {
            inner.next_id += 1;
            let id = inner.next_id;
            inner.rows.push(row.clone().with_id(id));
        }
        Ok(rows.len())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.lock()?.rows.len() as u64)
    }

    async fn scan(&self, filter: &StudentFilter, page: PageRequest) -> Result<Page<Row>> {
        let inner = self.lock()?;
        let matching: Vec<&Row> = inner.rows.iter().filter(|row| filter.matches(row)).collect();

        let items = matching
            .iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.size() as usize)
            .map(|row| (*row).clone())
            .collect();

        Ok(Page {
            items,
            page: page.page(),
            size: page.size(),
            total: matching.len() as u64,
        })
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(class_name: &str, score: u32) -> Row {
        Row::builder()
            .id(999)
            .first_name("Tom")
            .last_name("Davis")
            .date_of_birth(NaiveDate::from_ymd_opt(2005, 9, 18).unwrap())
            .class_name(class_name)
            .score(score)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let written = store
            .insert_batch(&[row("Class1", 60), row("Class2", 61)])
            .await
            .unwrap();
        assert_eq!(written, 2);

        store.insert_batch(&[row("Class1", 62)]).await.unwrap();

        let ids: Vec<Option<i64>> = store.snapshot().unwrap().iter().map(Row::id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_scan_pages_and_filters() {
        let store = MemoryStore::new();
        let rows: Vec<Row> = (0..25)
            .map(|i| row(if i % 2 == 0 { "Class1" } else { "Class2" }, 60 + i))
            .collect();
        store.insert_batch(&rows).await.unwrap();

        let page = store
            .scan(&StudentFilter::default(), PageRequest::new(2, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 25);
        assert_eq!(page.items[0].id(), Some(21));

        let filter = StudentFilter {
            class_name: Some("Class1".to_string()),
            ..StudentFilter::default()
        };
        let page = store.scan(&filter, PageRequest::new(0, 100).unwrap()).await.unwrap();
        assert_eq!(page.total, 13);
        assert!(page.items.iter().all(|r| r.class_name() == "Class1"));
    }

    #[tokio::test]
    async fn test_scan_by_id() {
        let store = MemoryStore::new();
        store
            .insert_batch(&[row("Class1", 60), row("Class3", 70)])
            .await
            .unwrap();

        let filter = StudentFilter {
            student_id: Some(2),
            ..StudentFilter::default()
        };
        let page = store.scan(&filter, PageRequest::new(0, 10).unwrap()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].class_name(), "Class3");
    }
}
