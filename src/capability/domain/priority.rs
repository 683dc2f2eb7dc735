//! Capability priority weight.

use super::CapabilityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of a capability when it appears as a preferred capability.
///
/// Ranges over `0..=10`; higher is more important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Lowest priority.
    pub const MIN: Self = Self(0);
    /// Highest priority.
    pub const MAX: Self = Self(10);
    /// Priority given to capabilities created without one.
    pub const DEFAULT: Self = Self(5);

    /// Creates a validated priority.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::PriorityOutOfRange`] when `value` lies
    /// outside `0..=10`.
    pub fn new(value: i64) -> Result<Self, CapabilityDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|weight| *weight <= Self::MAX.0)
            .map(Self)
            .ok_or(CapabilityDomainError::PriorityOutOfRange(value))
    }

    /// Returns the weight.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Priority {
    type Error = CapabilityDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
