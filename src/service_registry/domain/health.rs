//! Service health probe results.

use super::ParseHealthStatusError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of probing a service's health check URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The service declares no health check URL.
    Unknown,
    /// The health check URL answered with a success status.
    Healthy,
    /// The health check URL answered with a non-success status.
    Unhealthy,
    /// The health check URL could not be reached.
    Unreachable,
}

impl HealthStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HealthStatus {
    type Error = ParseHealthStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unknown" => Ok(Self::Unknown),
            "healthy" => Ok(Self::Healthy),
            "unhealthy" => Ok(Self::Unhealthy),
            "unreachable" => Ok(Self::Unreachable),
            _ => Err(ParseHealthStatusError(value.to_owned())),
        }
    }
}

/// Timestamped health probe result for a service record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    status: HealthStatus,
    checked_at: DateTime<Utc>,
    message: Option<String>,
}

impl HealthSnapshot {
    /// Creates a health snapshot.
    #[must_use]
    pub const fn new(status: HealthStatus, checked_at: DateTime<Utc>) -> Self {
        Self {
            status,
            checked_at,
            message: None,
        }
    }

    /// Creates an `unknown` snapshot for services without a health URL.
    #[must_use]
    pub fn unknown(checked_at: DateTime<Utc>) -> Self {
        Self::new(HealthStatus::Unknown, checked_at).with_message("no health check URL provided")
    }

    /// Creates a `healthy` snapshot.
    #[must_use]
    pub fn healthy(checked_at: DateTime<Utc>) -> Self {
        Self::new(HealthStatus::Healthy, checked_at).with_message("service is healthy")
    }

    /// Creates an `unhealthy` snapshot for a non-success HTTP status.
    #[must_use]
    pub fn unhealthy(checked_at: DateTime<Utc>, http_status: u16) -> Self {
        Self::new(HealthStatus::Unhealthy, checked_at)
            .with_message(format!("service returned status code {http_status}"))
    }

    /// Creates an `unreachable` snapshot with the transport failure.
    #[must_use]
    pub fn unreachable(checked_at: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self::new(HealthStatus::Unreachable, checked_at).with_message(reason)
    }

    /// Adds an explanatory message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let normalized = message.into().trim().to_owned();
        if !normalized.is_empty() {
            self.message = Some(normalized);
        }
        self
    }

    /// Returns the health status.
    #[must_use]
    pub const fn status(&self) -> HealthStatus {
        self.status
    }

    /// Returns the probe timestamp.
    #[must_use]
    pub const fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    /// Returns an optional detail message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
