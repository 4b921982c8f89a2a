//! PostgreSQL pool construction.

use helpdesk_core::DatabaseConfig;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::StorageError;

/// Open a pool for running migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;
    tracing::info!(url = %config.redacted_url(), "connected to PostgreSQL");
    Ok(pool)
}
