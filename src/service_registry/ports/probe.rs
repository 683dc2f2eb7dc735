//! Health probe port for registered services.

use crate::common::Endpoint;
use async_trait::async_trait;

/// Raw result of calling a service's health check URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The endpoint answered with a 2xx status.
    Healthy,
    /// The endpoint answered with another status code.
    Unhealthy(u16),
    /// The endpoint could not be reached.
    Unreachable(String),
}

/// Contract for checking a service's health endpoint.
///
/// Transport failures are outcomes, not errors: an unreachable service is a
/// health result like any other.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probes `health_check_url` once.
    async fn check(&self, health_check_url: &Endpoint) -> ProbeOutcome;
}
