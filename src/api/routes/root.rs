//! `GET /` and `GET /health`.

use super::{ApiResult, Shared};
use crate::api::{AppState, views::HealthView};
use axum::Json;
use axum::extract::State;
use mockable::Clock;

async fn report<C>(state: &AppState<C>, status: &str) -> ApiResult<HealthView>
where
    C: Clock + Send + Sync + 'static,
{
    let live_services = state.registry.list().await?.len();
    Ok(HealthView {
        service: env!("CARGO_PKG_NAME").to_owned(),
        status: status.to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        timestamp: state.clock().utc(),
        live_services,
    })
}

/// Describes the running registry.
pub async fn index<C>(State(state): Shared<C>) -> ApiResult<Json<HealthView>>
where
    C: Clock + Send + Sync + 'static,
{
    Ok(Json(report(&state, "running").await?))
}

/// Liveness probe for the registry itself.
///
/// Reads the liveness store, so a failing store yields 503.
pub async fn health<C>(State(state): Shared<C>) -> ApiResult<Json<HealthView>>
where
    C: Clock + Send + Sync + 'static,
{
    Ok(Json(report(&state, "healthy").await?))
}
