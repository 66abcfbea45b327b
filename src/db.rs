//! Database connection pool management.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Create a PostgreSQL connection pool from configuration.
pub async fn create_pool(cfg: &DatabaseConfig) -> Result<PgPool> {
    info!(
        max_connections = cfg.max_connections,
        min_connections = cfg.min_connections,
        "Creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&cfg.url)
        .await?;

    Ok(pool)
}
