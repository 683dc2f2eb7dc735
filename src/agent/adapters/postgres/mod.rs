//! `PostgreSQL` adapter for agent persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresAgentRepository;
