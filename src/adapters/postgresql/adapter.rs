//! PostgreSQL implementation of [`StudentStore`]

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{row_from_pg, StudentColumns};
use crate::adapters::store::traits::{Page, PageRequest, StudentFilter, StudentStore};
use crate::domain::{Result, RosterError, Row};
use async_trait::async_trait;
use std::sync::Arc;

const INSERT_BATCH_SQL: &str = r#"
    INSERT INTO students (first_name, last_name, dob, class_name, score)
    SELECT * FROM UNNEST($1::text[], $2::text[], $3::date[], $4::text[], $5::int4[])
"#;

const COUNT_SQL: &str = "SELECT COUNT(*) FROM students";

const SCAN_SQL: &str = r#"
    SELECT student_id, first_name, last_name, dob, class_name, score
    FROM students
    WHERE ($1::int8 IS NULL OR student_id = $1)
      AND ($2::text IS NULL OR class_name = $2)
    ORDER BY student_id
    LIMIT $3 OFFSET $4
"#;

const SCAN_COUNT_SQL: &str = r#"
    SELECT COUNT(*)
    FROM students
    WHERE ($1::int8 IS NULL OR student_id = $1)
      AND ($2::text IS NULL OR class_name = $2)
"#;

/// Wraps a [`PostgreSQLClient`] as a [`StudentStore`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn count_from(rows: &[tokio_postgres::Row]) -> Result<u64> {
    let count: i64 = rows
        .first()
        .ok_or_else(|| RosterError::Database("COUNT returned no rows".to_string()))?
        .try_get(0)
        .map_err(|e| RosterError::Database(format!("Bad COUNT result: {e}")))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

#[async_trait]
impl StudentStore for PostgreSQLAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn insert_batch(&self, rows: &[Row]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let columns = StudentColumns::from_rows(rows)?;
        let inserted = self
            .client
            .execute(
                INSERT_BATCH_SQL,
                &[
                    &columns.first_names,
                    &columns.last_names,
                    &columns.dobs,
                    &columns.class_names,
                    &columns.scores,
                ],
            )
            .await
            .map_err(|e| RosterError::BatchWrite {
                rows: rows.len(),
                reason: e.to_string(),
            })?;

        Ok(usize::try_from(inserted).unwrap_or(rows.len()))
    }

    async fn count(&self) -> Result<u64> {
        let rows = self.client.query(COUNT_SQL, &[]).await?;
        count_from(&rows)
    }

    async fn scan(&self, filter: &StudentFilter, page: PageRequest) -> Result<Page<Row>> {
        let limit = i64::from(page.size());
        let offset = i64::try_from(page.offset())
            .map_err(|_| RosterError::InvalidArgument("page offset too large".to_string()))?;

        let total_rows = self
            .client
            .query(SCAN_COUNT_SQL, &[&filter.student_id, &filter.class_name])
            .await?;
        let total = count_from(&total_rows)?;

        let pg_rows = self
            .client
            .query(
                SCAN_SQL,
                &[&filter.student_id, &filter.class_name, &limit, &offset],
            )
            .await?;

        let items = pg_rows.iter().map(row_from_pg).collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            page: page.page(),
            size: page.size(),
            total,
        })
    }

    fn backend_name(&self) -> &str {
        "postgresql"
    }
}
