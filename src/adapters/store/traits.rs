//! Store abstraction traits
//!
//! Every store backend implements [`StudentStore`]. Engines only see the
//! trait, so tests can substitute an in-memory or failing store.

use crate::domain::{Result, RosterError, Row};
use async_trait::async_trait;
use serde::Serialize;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Optional equality filters applied by [`StudentStore::scan`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub student_id: Option<i64>,
    pub class_name: Option<String>,
}

impl StudentFilter {
    /// True when `row` satisfies every set filter
    pub fn matches(&self, row: &Row) -> bool {
        let id_ok = match self.student_id {
            Some(id) => row.id() == Some(id),
            None => true,
        };
        let class_ok = match self.class_name {
            Some(ref class_name) => row.class_name() == class_name,
            None => true,
        };
        id_ok && class_ok
    }
}

/// Zero-based page position and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidArgument`] if `size` is zero or above
    /// [`MAX_PAGE_SIZE`].
    pub fn new(page: u32, size: u32) -> Result<Self> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(RosterError::InvalidArgument(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {size}"
            )));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Rows skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// The page after this one
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }
}

/// One page of results plus the total number of matches
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages()
    }
}

/// Persistent sink and source of student rows
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Test that the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Create the students table if it does not exist
    async fn ensure_schema(&self) -> Result<()>;

    /// Write one batch, returning how many rows were persisted
    ///
    /// Incoming ids are ignored; the store assigns identity. A batch is
    /// written as a single operation and either fails as a whole or
    /// reports its persisted count.
    async fn insert_batch(&self, rows: &[Row]) -> Result<usize>;

    /// Number of stored rows
    async fn count(&self) -> Result<u64>;

    /// One page of rows matching `filter`, ordered by id
    async fn scan(&self, filter: &StudentFilter, page: PageRequest) -> Result<Page<Row>>;

    /// Short backend name for logs
    fn backend_name(&self) -> &str;
}
