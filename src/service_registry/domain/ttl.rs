//! Liveness window for a service record.

use super::ServiceDomainError;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time-to-live in whole seconds.
///
/// A record is live while less than this many seconds have elapsed since
/// its last heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ttl(u32);

impl Ttl {
    /// Smallest accepted TTL.
    pub const MIN_SECONDS: u32 = 1;
    /// Largest accepted TTL (seven days).
    pub const MAX_SECONDS: u32 = 604_800;
    /// Fallback used when no configuration overrides it.
    pub const DEFAULT: Self = Self(60);

    /// Creates a validated TTL from seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::TtlOutOfRange`] when `seconds` lies
    /// outside `1..=604800`.
    pub fn from_secs(seconds: u64) -> Result<Self, ServiceDomainError> {
        u32::try_from(seconds)
            .ok()
            .filter(|value| (Self::MIN_SECONDS..=Self::MAX_SECONDS).contains(value))
            .map(Self)
            .ok_or(ServiceDomainError::TtlOutOfRange {
                min: Self::MIN_SECONDS,
                max: Self::MAX_SECONDS,
                actual: seconds,
            })
    }

    /// Returns the TTL in seconds.
    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.0
    }

    /// Returns the TTL as a signed duration for timestamp arithmetic.
    #[must_use]
    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.0))
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
