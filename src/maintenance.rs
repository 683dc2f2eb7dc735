//! Background loops run by the daemon: expired-record reaping and periodic
//! health probing.
//!
//! Both loops run until their task is aborted. Failures are logged and the
//! loop carries on with the next tick.

use crate::service_registry::{
    ports::{HealthProbe, LivenessStore},
    services::{ServiceHealthMonitor, ServiceRegistryService},
};
use mockable::Clock;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

/// Deletes expired service records every `period`.
pub async fn run_reaper<S, C>(registry: ServiceRegistryService<S, C>, period: Duration)
where
    S: LivenessStore + ?Sized,
    C: Clock + Send + Sync,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match registry.purge_expired().await {
            Ok(purged) => debug!(purged, "reaper sweep finished"),
            Err(err) => warn!(error = %err, "reaper sweep failed"),
        }
    }
}

/// Probes every live service every `period`.
pub async fn run_health_sweeps<S, P, C>(monitor: ServiceHealthMonitor<S, P, C>, period: Duration)
where
    S: LivenessStore + ?Sized,
    P: HealthProbe + ?Sized,
    C: Clock + Send + Sync,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match monitor.check_all().await {
            Ok(reports) => debug!(probed = reports.len(), "health sweep finished"),
            Err(err) => warn!(error = %err, "health sweep failed"),
        }
    }
}
