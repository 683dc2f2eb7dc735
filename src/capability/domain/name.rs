//! Capability name, the natural key used by matching.

use super::CapabilityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a capability name, matching the `VARCHAR(100)` column.
const MAX_NAME_LENGTH: usize = 100;

/// Capability name such as `diagnose_engine`.
///
/// Names compare literally after trimming. An agent may reference a name the
/// catalog does not (or no longer) define; matching still treats it as a
/// plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityName(String);

impl CapabilityName {
    /// Creates a validated capability name.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyCapabilityName`] when the value
    /// is empty after trimming,
    /// [`CapabilityDomainError::CapabilityNameTooLong`] when it exceeds 100
    /// characters, or [`CapabilityDomainError::InvalidCapabilityName`] when
    /// it contains control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(CapabilityDomainError::EmptyCapabilityName);
        }
        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(CapabilityDomainError::CapabilityNameTooLong(raw));
        }
        if normalized.chars().any(char::is_control) {
            return Err(CapabilityDomainError::InvalidCapabilityName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CapabilityName {
    type Error = CapabilityDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CapabilityName> for String {
    fn from(name: CapabilityName) -> Self {
        name.0
    }
}

impl AsRef<str> for CapabilityName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
