//! Domain model for agent directory entries.

mod agent;
mod capabilities;
mod error;
mod ids;
mod name;
mod status;

pub use agent::{Agent, AgentDraft, AgentQuery, AgentUpdate, PersistedAgentData, SnapshotScope};
pub use capabilities::CapabilitySet;
pub use error::{AgentDomainError, ParseAgentStatusError};
pub use ids::AgentId;
pub use name::{AgentName, AgentVersion};
pub use status::AgentStatus;
