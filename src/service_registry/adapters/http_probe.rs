//! HTTP health probe adapter.

use crate::common::Endpoint;
use crate::service_registry::ports::{HealthProbe, ProbeOutcome};
use async_trait::async_trait;
use std::time::Duration;

/// Probes health check URLs with an HTTP `GET`.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
}

impl HttpHealthProbe {
    /// Creates a probe whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] when the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self, health_check_url: &Endpoint) -> ProbeOutcome {
        match self.client.get(health_check_url.as_str()).send().await {
            Ok(response) if response.status().is_success() => ProbeOutcome::Healthy,
            Ok(response) => ProbeOutcome::Unhealthy(response.status().as_u16()),
            Err(err) => ProbeOutcome::Unreachable(format!("error checking service health: {err}")),
        }
    }
}
