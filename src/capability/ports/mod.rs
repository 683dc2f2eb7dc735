//! Port contracts for capability persistence.

pub mod repository;

pub use repository::{CapabilityRepository, CapabilityRepositoryError, CapabilityRepositoryResult};
