//! `PostgreSQL` adapters for service liveness persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresLivenessStore;
