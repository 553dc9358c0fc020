/// Database layer for Cinegraph
///
/// Manages the PostgreSQL connection pool and embedded migrations. All
/// catalog ranking logic (search, similarity, co-players) lives in
/// database functions created by the migrations; the application invokes
/// them through parameterized queries only.

pub mod models;

use crate::config::DatabaseConfig;
use crate::error::{ApiError, ApiResult};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Create a PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> ApiResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(ApiError::Database)?;

    Ok(pool)
}

/// Create a pool without establishing a connection. Used by tests that
/// exercise validation paths which never reach the database.
pub fn create_lazy_pool(config: &DatabaseConfig) -> ApiResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy(&config.url)
        .map_err(ApiError::Database)
}

/// Run migrations embedded at compile time from ./migrations
pub async fn run_migrations(pool: &PgPool) -> ApiResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| ApiError::Internal(format!("Migration failed: {}", e)))?;

    Ok(())
}

/// Test database connection
pub async fn test_connection(pool: &PgPool) -> ApiResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(ApiError::Database)?;

    Ok(())
}
