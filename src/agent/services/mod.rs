//! Orchestration services for the agent directory.

mod directory;

pub use directory::{
    AgentDirectoryService, AgentDirectoryServiceError, AgentDirectoryServiceResult,
    RegisterAgentRequest, UpdateAgentRequest,
};
