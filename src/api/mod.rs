//! HTTP surface of the registry.
//!
//! Handlers are thin: they parse the wire body, call one service and render
//! the result. Stores are held as trait objects so the daemon can pick the
//! in-memory or `PostgreSQL` adapters at start-up.

mod error;
mod routes;
pub mod views;

pub use error::ApiError;

use crate::agent::{ports::AgentRepository, services::AgentDirectoryService};
use crate::capability::{ports::CapabilityRepository, services::CapabilityCatalogService};
use crate::matching::services::AgentMatchingService;
use crate::service_registry::{
    domain::Ttl,
    ports::{HealthProbe, LivenessStore},
    services::{ServiceHealthMonitor, ServiceRegistryService},
};
use axum::Router;
use axum::routing::{get, post, put};
use mockable::Clock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Store and probe implementations the API runs against.
#[derive(Clone)]
pub struct Backends {
    /// Service liveness store.
    pub liveness: Arc<dyn LivenessStore>,
    /// Agent directory store.
    pub agents: Arc<dyn AgentRepository>,
    /// Capability catalog store.
    pub capabilities: Arc<dyn CapabilityRepository>,
    /// Health probe used by `/status`.
    pub probe: Arc<dyn HealthProbe>,
}

/// Services shared by all handlers.
pub struct AppState<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Service registry.
    pub registry: ServiceRegistryService<dyn LivenessStore, C>,
    /// Health monitor.
    pub health: ServiceHealthMonitor<dyn LivenessStore, dyn HealthProbe, C>,
    /// Agent directory.
    pub agents: AgentDirectoryService<dyn AgentRepository, dyn CapabilityRepository, C>,
    /// Capability catalog.
    pub catalog: CapabilityCatalogService<dyn CapabilityRepository, dyn AgentRepository, C>,
    /// Matching engine.
    pub matcher: AgentMatchingService<dyn AgentRepository, dyn CapabilityRepository>,
    clock: Arc<C>,
}

impl<C> AppState<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Wires every service to `backends`.
    #[must_use]
    pub fn new(backends: Backends, clock: Arc<C>, default_ttl: Ttl) -> Self {
        let Backends {
            liveness,
            agents,
            capabilities,
            probe,
        } = backends;
        Self {
            registry: ServiceRegistryService::new(Arc::clone(&liveness), Arc::clone(&clock))
                .with_default_ttl(default_ttl),
            health: ServiceHealthMonitor::new(liveness, probe, Arc::clone(&clock)),
            agents: AgentDirectoryService::new(
                Arc::clone(&agents),
                Arc::clone(&capabilities),
                Arc::clone(&clock),
            ),
            catalog: CapabilityCatalogService::new(
                Arc::clone(&capabilities),
                Arc::clone(&agents),
                Arc::clone(&clock),
            ),
            matcher: AgentMatchingService::new(agents, capabilities),
            clock,
        }
    }

    /// Returns the clock used for response timestamps.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Builds the application router.
pub fn router<C>(state: Arc<AppState<C>>) -> Router
where
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(routes::root::index::<C>))
        .route("/health", get(routes::root::health::<C>))
        .route(
            "/services",
            post(routes::services::register::<C>).get(routes::services::list::<C>),
        )
        .route(
            "/services/discovery/:name",
            get(routes::services::discover::<C>),
        )
        .route(
            "/services/:id",
            get(routes::services::fetch::<C>)
                .put(routes::services::update::<C>)
                .delete(routes::services::deregister::<C>),
        )
        .route(
            "/services/:id/heartbeat",
            put(routes::services::heartbeat::<C>),
        )
        .route("/status", get(routes::status::check_all::<C>))
        .route("/status/:id", get(routes::status::check_one::<C>))
        .route(
            "/agents",
            post(routes::agents::register::<C>).get(routes::agents::list::<C>),
        )
        .route("/agents/find", post(routes::agents::find::<C>))
        .route(
            "/agents/:id",
            get(routes::agents::fetch::<C>)
                .put(routes::agents::update::<C>)
                .delete(routes::agents::delete::<C>),
        )
        .route(
            "/capabilities",
            post(routes::capabilities::create::<C>).get(routes::capabilities::list::<C>),
        )
        .route(
            "/capabilities/:id",
            get(routes::capabilities::fetch::<C>)
                .put(routes::capabilities::update::<C>)
                .delete(routes::capabilities::delete::<C>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
