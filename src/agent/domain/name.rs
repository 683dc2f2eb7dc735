//! Agent name and version values.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 255;
const MAX_VERSION_LENGTH: usize = 100;

/// Unique, human-readable agent name such as `engine-diagnostics`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentName`] when the value is empty
    /// after trimming, [`AgentDomainError::AgentNameTooLong`] when it exceeds
    /// 255 characters, or [`AgentDomainError::InvalidAgentName`] when it
    /// contains control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyAgentName);
        }
        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(AgentDomainError::AgentNameTooLong(raw));
        }
        if normalized.chars().any(char::is_control) {
            return Err(AgentDomainError::InvalidAgentName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form agent version label, for example `1.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentVersion(String);

impl AgentVersion {
    /// Creates a validated version label.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyVersion`] or
    /// [`AgentDomainError::VersionTooLong`].
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyVersion);
        }
        if normalized.chars().count() > MAX_VERSION_LENGTH {
            return Err(AgentDomainError::VersionTooLong(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
