//! Error types for agent domain validation.

use crate::capability::domain::CapabilityDomainError;
use crate::common::InvalidEndpointError;
use thiserror::Error;

/// Errors returned while constructing agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent name is empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// The agent name contains control characters.
    #[error("agent name '{0}' contains control characters")]
    InvalidAgentName(String),

    /// The agent name exceeds the 255-character storage limit.
    #[error("agent name exceeds 255 character limit: {0}")]
    AgentNameTooLong(String),

    /// The version is empty after trimming.
    #[error("agent version must not be empty")]
    EmptyVersion,

    /// The version exceeds the 100-character storage limit.
    #[error("agent version exceeds 100 character limit: {0}")]
    VersionTooLong(String),

    /// An endpoint failed validation.
    #[error(transparent)]
    InvalidEndpoint(#[from] InvalidEndpointError),

    /// A capability name failed validation.
    #[error(transparent)]
    InvalidCapability(#[from] CapabilityDomainError),
}

/// Error returned when parsing an agent status from storage or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);
