//! Structured logging setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error returned when the global subscriber cannot be installed.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryInitError(String);

/// Installs the global `tracing` subscriber.
///
/// Honours `RUST_LOG`; `json` switches the formatter to one JSON object per
/// line.
///
/// # Errors
///
/// Returns [`TelemetryInitError`] when a global subscriber is already set.
pub fn init(json: bool) -> Result<(), TelemetryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| TelemetryInitError(err.to_string()))
}
