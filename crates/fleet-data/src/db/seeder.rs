//! Database seeding utilities.

use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use thiserror::Error;
use tracing::info;

use fleetlogix::FleetError;
use fleetlogix::database::Database;
use fleetlogix::models::Table;

use crate::config::MAX_BATCH_SIZE;
use crate::dataset::Dataset;
use crate::db::rows::TableRow;
use crate::errors::GenerationError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Fleet(#[from] FleetError),
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Loads a generated dataset into Postgres.
pub struct Seeder {
    pool: PgPool,
    batch_size: usize,
}

impl Seeder {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            batch_size: 1000,
        }
    }

    /// Sets the rows per insert statement, capped at [`MAX_BATCH_SIZE`].
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Fails with the list of missing tables if the schema is incomplete.
    pub async fn verify_schema(&self) -> Result<(), SeedError> {
        Database::new(self.pool.clone()).verify_tables().await?;
        Ok(())
    }

    /// Replaces the contents of all six tables with `dataset`.
    ///
    /// Truncation and every insert share one transaction, so a failed or
    /// interrupted load leaves the previous contents in place.
    pub async fn load(&self, dataset: &Dataset) -> Result<(), SeedError> {
        info!(
            "Loading {} rows in batches of {}...",
            dataset.total_rows(),
            self.batch_size
        );
        let mut tx = self.pool.begin().await?;

        truncate_all(&mut tx).await?;

        self.insert_rows(&mut tx, &dataset.vehicles).await?;
        self.insert_rows(&mut tx, &dataset.drivers).await?;
        self.insert_rows(&mut tx, &dataset.routes).await?;
        self.insert_rows(&mut tx, &dataset.trips).await?;
        self.insert_rows(&mut tx, &dataset.deliveries).await?;
        self.insert_rows(&mut tx, &dataset.maintenance).await?;

        tx.commit().await?;
        info!("Loaded {} rows", dataset.total_rows());
        Ok(())
    }

    /// Inserts `rows` in batches, then moves the id sequence past the last id.
    async fn insert_rows<R: TableRow + Sync>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rows: &[R],
    ) -> Result<(), SeedError> {
        let table = R::TABLE.as_str();
        info!("Seeding {} {}...", rows.len(), table);

        for chunk in rows.chunks(self.batch_size) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {table} ({}) ",
                R::COLUMNS.join(", ")
            ));
            builder.push_values(chunk, |row, record| record.bind(row));
            builder.build().execute(&mut **tx).await?;
        }

        // Keep later SERIAL inserts from colliding with the explicit ids.
        let key = R::COLUMNS[0];
        sqlx::query(&format!(
            "SELECT setval(pg_get_serial_sequence('{table}', '{key}'), \
             COALESCE((SELECT MAX({key}) FROM {table}), 0) + 1, false)"
        ))
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Empties all six tables and resets their id sequences.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        info!("Clearing all FleetLogix tables...");
        let mut tx = self.pool.begin().await?;
        truncate_all(&mut tx).await?;
        tx.commit().await?;
        info!("All tables cleared");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn truncate_all(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
    let tables: Vec<&str> = Table::LOAD_ORDER.iter().rev().map(|t| t.as_str()).collect();
    sqlx::query(&format!(
        "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
        tables.join(", ")
    ))
    .execute(&mut **tx)
    .await?;
    Ok(())
}
