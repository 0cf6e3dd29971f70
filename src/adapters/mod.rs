//! External system adapters
//!
//! - [`store`]: the [`StudentStore`](store::StudentStore) gateway, its
//!   in-memory backend and factory
//! - [`postgresql`]: PostgreSQL backend

pub mod postgresql;
pub mod store;
