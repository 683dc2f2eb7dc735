//! Validated logical service name.

use super::ServiceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a service name, matching the `VARCHAR(255)` column.
const MAX_NAME_LENGTH: usize = 255;

/// Logical service name shared by every instance of the same service.
///
/// Names are not unique: several live records may carry the same name, and
/// discovery returns all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// The input is trimmed but otherwise kept verbatim, so
    /// `agent-card-registry` and `Agent-Card-Registry` are different names.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::EmptyServiceName`] when the value is
    /// empty after trimming, [`ServiceDomainError::ServiceNameTooLong`] when
    /// it exceeds 255 characters, or
    /// [`ServiceDomainError::InvalidServiceName`] when it contains control
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ServiceDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(ServiceDomainError::EmptyServiceName);
        }

        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(ServiceDomainError::ServiceNameTooLong(raw));
        }

        if normalized.chars().any(char::is_control) {
            return Err(ServiceDomainError::InvalidServiceName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the service name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
