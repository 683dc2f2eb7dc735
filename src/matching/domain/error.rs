//! Errors for structurally invalid match requests.

use crate::capability::domain::CapabilityDomainError;
use thiserror::Error;

/// Errors returned while building a [`super::MatchRequest`].
///
/// "No agent matched" is never an error; it is an empty ranking.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatchError {
    /// A required or preferred capability name is invalid.
    #[error(transparent)]
    InvalidCapability(#[from] CapabilityDomainError),

    /// A metadata filter value is not a string, number or boolean.
    #[error("metadata filter '{key}' has unsupported {kind} value; expected string, number or boolean")]
    UnsupportedFilterValue {
        /// Filter key.
        key: String,
        /// JSON kind of the rejected value.
        kind: &'static str,
    },
}
