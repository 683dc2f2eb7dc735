//! Daemon configuration from command-line flags and environment variables.
//!
//! Every setting can be given as a flag or through its environment
//! variable; flags win.

use crate::service_registry::domain::{ServiceDomainError, Ttl};
use clap::{Parser, value_parser};
use std::net::SocketAddr;
use std::time::Duration;

/// Runtime settings for the registry daemon.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "wayfinder", version, about = "Service and capability registry")]
pub struct RegistrySettings {
    /// Socket address the HTTP API listens on.
    #[arg(long, env = "WAYFINDER_BIND", default_value = "0.0.0.0:8007")]
    pub bind: SocketAddr,

    /// Default liveness window for registered services, in seconds.
    #[arg(
        long = "service-ttl",
        env = "SERVICE_TTL",
        default_value_t = 60,
        value_parser = value_parser!(u64).range(1..=604_800)
    )]
    pub service_ttl_secs: u64,

    /// Seconds between sweeps that delete expired service records.
    #[arg(
        long = "reaper-interval",
        env = "REAPER_INTERVAL",
        default_value_t = 30,
        value_parser = value_parser!(u64).range(1..)
    )]
    pub reaper_interval_secs: u64,

    /// Seconds between health probes of live services.
    #[arg(
        long = "healthcheck-interval",
        env = "HEALTHCHECK_INTERVAL",
        default_value_t = 30,
        value_parser = value_parser!(u64).range(1..)
    )]
    pub healthcheck_interval_secs: u64,

    /// Timeout for a single health probe, in seconds.
    #[arg(
        long = "healthcheck-timeout",
        env = "HEALTHCHECK_TIMEOUT",
        default_value_t = 5,
        value_parser = value_parser!(u64).range(1..)
    )]
    pub healthcheck_timeout_secs: u64,

    /// `PostgreSQL` connection URL; in-memory stores are used when unset.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(
        long = "database-pool-size",
        env = "DATABASE_POOL_SIZE",
        default_value_t = 10,
        value_parser = value_parser!(u32).range(1..)
    )]
    pub database_pool_size: u32,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json", env = "WAYFINDER_LOG_JSON")]
    pub log_json: bool,
}

impl RegistrySettings {
    /// Returns the default service TTL.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::TtlOutOfRange`] when the configured
    /// value is outside the accepted window.
    pub fn service_ttl(&self) -> Result<Ttl, ServiceDomainError> {
        Ttl::from_secs(self.service_ttl_secs)
    }

    /// Returns the reaper period.
    #[must_use]
    pub const fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs)
    }

    /// Returns the health sweep period.
    #[must_use]
    pub const fn healthcheck_interval(&self) -> Duration {
        Duration::from_secs(self.healthcheck_interval_secs)
    }

    /// Returns the per-probe timeout.
    #[must_use]
    pub const fn healthcheck_timeout(&self) -> Duration {
        Duration::from_secs(self.healthcheck_timeout_secs)
    }
}
