//! Domain models and types for Rosterflow.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **The student record** ([`Row`]) shared by every pipeline stage
//! - **Typed spreadsheet cells** ([`CellValue`])
//! - **Error types** ([`RosterError`], [`RowDecodeError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, RosterError>`]:
//!
//! ```rust,no_run
//! use rosterflow::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = rosterflow::config::load_config("rosterflow.toml")?;
//!     println!("batch size: {}", config.ingestion.batch_size);
//!     Ok(())
//! }
//! ```

pub mod cell;
pub mod errors;
pub mod result;
pub mod row;

pub use cell::CellValue;
pub use errors::{RosterError, RowDecodeError};
pub use result::Result;
pub use row::{Row, RowBuilder, HEADER};
