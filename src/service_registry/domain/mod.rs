//! Domain model for service registration and liveness.
//!
//! The service registry domain models service identity, connection
//! endpoints, the liveness window, and the most recent health probe result.
//! Storage and transport concerns are kept outside the domain boundary.

mod error;
mod health;
mod ids;
mod name;
mod record;
mod ttl;

pub use error::{ParseHealthStatusError, ServiceDomainError};
pub use health::{HealthSnapshot, HealthStatus};
pub use ids::ServiceId;
pub use name::ServiceName;
pub use record::{PersistedServiceData, ServiceDraft, ServiceRecord, ServiceUpdate};
pub use ttl::Ttl;
