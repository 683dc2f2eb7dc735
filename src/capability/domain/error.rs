//! Error types for capability domain validation.

use thiserror::Error;

/// Errors returned while constructing capability domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityDomainError {
    /// The capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyCapabilityName,

    /// The capability name contains control characters.
    #[error("capability name '{0}' contains control characters")]
    InvalidCapabilityName(String),

    /// The capability name exceeds the 100-character storage limit.
    #[error("capability name exceeds 100 character limit: {0}")]
    CapabilityNameTooLong(String),

    /// The category is empty after trimming.
    #[error("capability category must not be empty when provided")]
    EmptyCategory,

    /// The priority is outside `0..=10`.
    #[error("capability priority must be between 0 and 10, got {0}")]
    PriorityOutOfRange(i64),
}
