//! In-memory adapters for capability persistence.

mod repository;

pub use repository::InMemoryCapabilityRepository;
