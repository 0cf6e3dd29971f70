//! Student store gateway
//!
//! The trait every backend implements, the in-process backend, and the
//! factory that picks one from configuration.

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_student_store;
pub use memory::MemoryStore;
pub use traits::{Page, PageRequest, StudentFilter, StudentStore, MAX_PAGE_SIZE};
