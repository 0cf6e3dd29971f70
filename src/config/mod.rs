//! Configuration management for Rosterflow.
//!
//! # Overview
//!
//! Rosterflow reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ROSTERFLOW_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rosterflow::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rosterflow.toml")?;
//!
//! println!("Output root: {}", config.storage.root_path);
//! println!("Batch size: {}", config.ingestion.batch_size);
//! println!("Store: {}", config.database_target);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and dry-run switch
//! - [`StorageConfig`] - output root and per-category folders
//! - [`GenerationConfig`] - synthetic workbook limits
//! - [`ConversionConfig`] - workbook to CSV settings
//! - [`IngestionConfig`] - batch size and write timeout
//! - [`PostgreSQLConfig`] - connection pool settings
//! - [`LoggingConfig`] - local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [storage]
//! root_path = "/var/lib/rosterflow"
//!
//! [ingestion]
//! batch_size = 5000
//! batch_timeout_seconds = 30
//!
//! [postgresql]
//! connection_string = "${ROSTERFLOW_PG_URL}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, ConversionConfig, DatabaseTarget, GenerationConfig, IngestionConfig,
    LoggingConfig, PostgreSQLConfig, RosterConfig, StorageConfig, MAX_AUTOFIT_THRESHOLD,
};
pub use secret::{secret_string, SecretString, SecretValue};
