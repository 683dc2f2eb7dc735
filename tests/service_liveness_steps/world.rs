//! Shared world state for service liveness BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rstest::fixture;
use wayfinder::common::ManualClock;
use wayfinder::service_registry::{
    adapters::memory::InMemoryLivenessStore,
    domain::ServiceRecord,
    services::{ServiceRegistryService, ServiceRegistryServiceError},
};

/// Service type used by the BDD world.
pub type TestRegistryService = ServiceRegistryService<InMemoryLivenessStore, ManualClock>;

/// Scenario world for service liveness behaviour tests.
pub struct LivenessWorld {
    /// The registry service under test.
    pub service: TestRegistryService,
    /// Clock driving TTL expiry.
    pub clock: Arc<ManualClock>,
    /// Last registered service.
    pub registered: Option<ServiceRecord>,
    /// Result of the last heartbeat.
    pub last_heartbeat: Option<Result<ServiceRecord, ServiceRegistryServiceError>>,
    /// Result of the last deregistration.
    pub last_deregistration: Option<Result<(), ServiceRegistryServiceError>>,
}

impl LivenessWorld {
    /// Creates a world with the clock at the Unix epoch.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH));
        Self {
            service: ServiceRegistryService::new(
                Arc::new(InMemoryLivenessStore::new()),
                Arc::clone(&clock),
            ),
            clock,
            registered: None,
            last_heartbeat: None,
            last_deregistration: None,
        }
    }

    /// Returns the registered service record.
    ///
    /// # Errors
    ///
    /// Returns an error when no service has been registered yet.
    pub fn registered(&self) -> Result<&ServiceRecord, eyre::Report> {
        self.registered
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no registered service in scenario world"))
    }
}

impl Default for LivenessWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LivenessWorld {
    LivenessWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
