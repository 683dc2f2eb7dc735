//! `PostgreSQL` adapter for capability persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresCapabilityRepository;
