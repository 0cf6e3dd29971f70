//! Store factory
//!
//! Builds the store selected by `database_target`.

use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::store::memory::MemoryStore;
use crate::adapters::store::traits::StudentStore;
use crate::config::schema::{DatabaseTarget, RosterConfig};
use crate::domain::{Result, RosterError};
use std::sync::Arc;

/// Create a store client based on the configuration
///
/// # Errors
///
/// Returns an error if the PostgreSQL section is missing or the pool cannot
/// be built.
pub async fn create_student_store(config: &RosterConfig) -> Result<Arc<dyn StudentStore>> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                RosterError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL store");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            Ok(Arc::new(PostgreSQLAdapter::new(client)) as Arc<dyn StudentStore>)
        }
        DatabaseTarget::Memory => {
            tracing::info!("Creating in-memory store");
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn StudentStore>)
        }
    }
}
