//! `PostgreSQL` connection pooling and schema bootstrap.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// `PostgreSQL` connection pool shared by every persistence adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Registry schema, applied idempotently at start-up.
const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_registry_tables/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum DatabaseSetupError {
    /// The pool could not be created or a connection checked out.
    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),
    /// Applying the schema failed.
    #[error("schema bootstrap failed: {0}")]
    Schema(#[from] diesel::result::Error),
    /// The blocking bootstrap task panicked or was cancelled.
    #[error("schema bootstrap task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`DatabaseSetupError::Pool`] when the pool cannot establish its
/// initial connections.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, DatabaseSetupError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(Pool::builder().max_size(max_size).build(manager)?)
}

/// Creates registry tables and indexes that do not yet exist.
///
/// # Errors
///
/// Returns [`DatabaseSetupError`] when a connection cannot be obtained or a
/// statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), DatabaseSetupError> {
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get()?;
        connection.batch_execute(SCHEMA_SQL)?;
        Ok(())
    })
    .await?
}
