//! Health probe endpoints.

use super::{ApiResult, Shared};
use crate::api::{ApiError, views::StatusView};
use crate::service_registry::domain::ServiceId;
use axum::Json;
use axum::extract::{Path, State};
use mockable::Clock;

/// `GET /status`: probes every live service.
pub async fn check_all<C>(State(state): Shared<C>) -> ApiResult<Json<Vec<StatusView>>>
where
    C: Clock + Send + Sync + 'static,
{
    let reports = state.health.check_all().await?;
    Ok(Json(reports.into_iter().map(StatusView::from).collect()))
}

/// `GET /status/{id}`: probes one live service.
pub async fn check_one<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<StatusView>>
where
    C: Clock + Send + Sync + 'static,
{
    let id: ServiceId = raw_id
        .parse()
        .map_err(|_| ApiError::unknown_id("service", &raw_id))?;
    let report = state.health.check(id).await?;
    Ok(Json(StatusView::from(report)))
}
