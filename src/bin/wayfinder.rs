//! Registry daemon.
//!
//! Serves the HTTP API and runs the expired-record reaper and periodic
//! health probing until interrupted. Configuration comes from flags or
//! their environment variables (see `wayfinder --help`); with no
//! `DATABASE_URL` every store lives in memory.

use clap::Parser;
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};
use wayfinder::{
    agent::adapters::{memory::InMemoryAgentRepository, postgres::PostgresAgentRepository},
    api::{self, AppState, Backends},
    capability::adapters::{
        memory::InMemoryCapabilityRepository, postgres::PostgresCapabilityRepository,
    },
    config::RegistrySettings,
    db::{self, DatabaseSetupError},
    maintenance,
    service_registry::{
        adapters::{
            HttpHealthProbe, memory::InMemoryLivenessStore, postgres::PostgresLivenessStore,
        },
        domain::ServiceDomainError,
        ports::HealthProbe,
    },
    telemetry::{self, TelemetryInitError},
};

/// Errors that stop the daemon.
#[derive(Debug, Error)]
enum DaemonError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryInitError),
    #[error("invalid service TTL: {0}")]
    Ttl(#[from] ServiceDomainError),
    #[error(transparent)]
    Database(#[from] DatabaseSetupError),
    #[error("failed to build health probe client: {0}")]
    Probe(#[from] reqwest::Error),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

async fn connect_backends(
    settings: &RegistrySettings,
    probe: Arc<dyn HealthProbe>,
) -> Result<Backends, DaemonError> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("DATABASE_URL unset; registry state is kept in memory");
        return Ok(Backends {
            liveness: Arc::new(InMemoryLivenessStore::new()),
            agents: Arc::new(InMemoryAgentRepository::new()),
            capabilities: Arc::new(InMemoryCapabilityRepository::new()),
            probe,
        });
    };

    let pool = db::build_pool(database_url, settings.database_pool_size)?;
    db::apply_schema(&pool).await?;
    info!(pool_size = settings.database_pool_size, "database schema ready");
    Ok(Backends {
        liveness: Arc::new(PostgresLivenessStore::new(pool.clone())),
        agents: Arc::new(PostgresAgentRepository::new(pool.clone())),
        capabilities: Arc::new(PostgresCapabilityRepository::new(pool)),
        probe,
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    let settings = RegistrySettings::parse();
    telemetry::init(settings.log_json)?;

    let default_ttl = settings.service_ttl()?;
    let probe: Arc<dyn HealthProbe> =
        Arc::new(HttpHealthProbe::new(settings.healthcheck_timeout())?);
    let backends = connect_backends(&settings, probe).await?;
    let state = Arc::new(AppState::new(
        backends,
        Arc::new(DefaultClock),
        default_ttl,
    ));

    let reaper = tokio::spawn(maintenance::run_reaper(
        state.registry.clone(),
        settings.reaper_interval(),
    ));
    let health_sweeps = tokio::spawn(maintenance::run_health_sweeps(
        state.health.clone(),
        settings.healthcheck_interval(),
    ));

    let listener = TcpListener::bind(settings.bind).await?;
    info!(
        addr = %settings.bind,
        ttl = %default_ttl,
        version = env!("CARGO_PKG_VERSION"),
        "wayfinder listening"
    );
    let served = axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    reaper.abort();
    health_sweeps.abort();
    served?;
    info!("shutdown complete");
    Ok(())
}
