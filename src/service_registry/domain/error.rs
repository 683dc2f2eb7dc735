//! Error types for service registry domain validation and parsing.

use crate::common::InvalidEndpointError;
use thiserror::Error;

/// Errors returned while constructing service registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceDomainError {
    /// The service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The service name contains control characters.
    #[error("service name '{0}' contains control characters")]
    InvalidServiceName(String),

    /// The service name exceeds the 255-character storage limit.
    #[error("service name exceeds 255 character limit: {0}")]
    ServiceNameTooLong(String),

    /// The service URL or health check URL is malformed.
    #[error(transparent)]
    InvalidEndpoint(#[from] InvalidEndpointError),

    /// The time-to-live is outside the accepted range.
    #[error("ttl must be between {min} and {max} seconds, got {actual}")]
    TtlOutOfRange {
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
        /// Rejected value.
        actual: u64,
    },
}

/// Error returned while parsing a health status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service health status: {0}")]
pub struct ParseHealthStatusError(pub String);
