use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use crate::errors::FleetError;
use crate::models::Table;

/// Bundled schema for the six FleetLogix tables.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migration.
    pub async fn migrate(&self) -> Result<(), FleetError> {
        MIGRATOR.run(&self.pool).await?;
        info!("Schema migrations applied");
        Ok(())
    }

    /// Checks that every FleetLogix table exists in the current schema.
    pub async fn verify_tables(&self) -> Result<(), FleetError> {
        let existing: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = current_schema()
              AND table_type = 'BASE TABLE'
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let missing: Vec<String> = Table::LOAD_ORDER
            .iter()
            .map(|t| t.as_str())
            .filter(|name| !existing.iter().any(|e| e == name))
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(FleetError::MissingTables(missing));
        }

        info!("All {} required tables exist", Table::LOAD_ORDER.len());
        Ok(())
    }

    /// Returns the number of rows currently stored in a table.
    pub async fn row_count(&self, table: Table) -> Result<i64, FleetError> {
        // Table names come from a closed enum, never from user input.
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table.as_str()))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
