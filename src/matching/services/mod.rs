//! Orchestration services for agent matching.

mod finder;

pub use finder::{AgentMatchingService, AgentMatchingServiceError, AgentMatchingServiceResult};
