//! In-memory adapters for the service registry.

mod liveness;

pub use liveness::InMemoryLivenessStore;
