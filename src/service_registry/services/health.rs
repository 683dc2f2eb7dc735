//! Health probing of live services.

use crate::service_registry::{
    domain::{HealthSnapshot, HealthStatus, ServiceId, ServiceName, ServiceRecord},
    ports::{HealthProbe, LivenessStore, LivenessStoreError, ProbeOutcome},
    services::ServiceRegistryServiceError,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Health probe result for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatusReport {
    /// Probed service.
    pub service_id: ServiceId,
    /// Name of the probed service.
    pub name: ServiceName,
    /// Probe result.
    pub snapshot: HealthSnapshot,
}

/// Probes health endpoints of live services and records the results.
///
/// Probing never extends a service's liveness window.
pub struct ServiceHealthMonitor<S, P, C>
where
    S: LivenessStore + ?Sized,
    P: HealthProbe + ?Sized,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    probe: Arc<P>,
    clock: Arc<C>,
}

impl<S, P, C> Clone for ServiceHealthMonitor<S, P, C>
where
    S: LivenessStore + ?Sized,
    P: HealthProbe + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            probe: Arc::clone(&self.probe),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, P, C> ServiceHealthMonitor<S, P, C>
where
    S: LivenessStore + ?Sized,
    P: HealthProbe + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a health monitor.
    #[must_use]
    pub const fn new(store: Arc<S>, probe: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            probe,
            clock,
        }
    }

    /// Probes one live service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::NotFound`] when the service is
    /// not live, or [`ServiceRegistryServiceError::Store`] when the store
    /// fails.
    pub async fn check(
        &self,
        id: ServiceId,
    ) -> Result<ServiceStatusReport, ServiceRegistryServiceError> {
        let record = self
            .store
            .find_live(id, self.clock.utc())
            .await?
            .ok_or(ServiceRegistryServiceError::NotFound(id))?;
        self.check_record(record).await
    }

    /// Probes every live service in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::Store`] when the store fails.
    pub async fn check_all(&self) -> Result<Vec<ServiceStatusReport>, ServiceRegistryServiceError> {
        let records = self.store.scan_live(self.clock.utc()).await?;
        let mut reports = Vec::with_capacity(records.len());
        for record in records {
            reports.push(self.check_record(record).await?);
        }
        Ok(reports)
    }

    async fn check_record(
        &self,
        record: ServiceRecord,
    ) -> Result<ServiceStatusReport, ServiceRegistryServiceError> {
        let snapshot = match record.health_check_url() {
            None => HealthSnapshot::unknown(self.clock.utc()),
            Some(url) => {
                let outcome = self.probe.check(url).await;
                let checked_at = self.clock.utc();
                match outcome {
                    ProbeOutcome::Healthy => HealthSnapshot::healthy(checked_at),
                    ProbeOutcome::Unhealthy(code) => HealthSnapshot::unhealthy(checked_at, code),
                    ProbeOutcome::Unreachable(reason) => {
                        HealthSnapshot::unreachable(checked_at, reason)
                    }
                }
            }
        };

        match self
            .store
            .record_health(record.id(), &snapshot, self.clock.utc())
            .await
        {
            Ok(()) => {}
            Err(LivenessStoreError::NotFound(id)) => {
                debug!(service_id = %id, "service expired during health probe");
            }
            Err(err) => return Err(err.into()),
        }

        if snapshot.status() != HealthStatus::Healthy
            && record.health_check_url().is_some()
        {
            warn!(
                service_id = %record.id(),
                name = %record.name(),
                status = %snapshot.status(),
                "service health check failed"
            );
        }

        Ok(ServiceStatusReport {
            service_id: record.id(),
            name: record.name().clone(),
            snapshot,
        })
    }
}
