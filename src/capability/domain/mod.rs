//! Domain model for capability definitions.

mod capability;
mod error;
mod ids;
mod name;
mod priority;

pub(crate) use capability::normalize_category;
pub use capability::{
    Capability, CapabilityDraft, CapabilityQuery, CapabilityUpdate, PersistedCapabilityData,
};
pub use error::CapabilityDomainError;
pub use ids::CapabilityId;
pub use name::CapabilityName;
pub use priority::Priority;
