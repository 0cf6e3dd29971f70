//! PostgreSQL store backend
//!
//! Rows are kept in a single `students` table. Each batch is one
//! `INSERT ... SELECT FROM UNNEST(...)` statement.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
