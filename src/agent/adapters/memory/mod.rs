//! In-memory adapters for agent persistence.

mod repository;

pub use repository::InMemoryAgentRepository;
