//! Service registry endpoints.

use super::{ApiResult, Shared};
use crate::api::{
    ApiError,
    views::{RegisterServiceBody, ServiceView, UpdateServiceBody},
};
use crate::service_registry::{
    domain::ServiceId,
    services::{RegisterServiceRequest, UpdateServiceRequest},
};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use mockable::Clock;

fn parse_id(raw: &str) -> ApiResult<ServiceId> {
    raw.parse()
        .map_err(|_| ApiError::unknown_id("service", raw))
}

/// `POST /services`: registers a new instance.
pub async fn register<C>(
    State(state): Shared<C>,
    body: Result<Json<RegisterServiceBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ServiceView>)>
where
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = body?;
    let mut request = RegisterServiceRequest::new(body.name, body.url).with_metadata(body.metadata);
    if let Some(url) = body.health_check_url {
        request = request.with_health_check_url(url);
    }
    if let Some(seconds) = body.ttl_seconds {
        request = request.with_ttl_seconds(seconds);
    }
    let record = state.registry.register(request).await?;
    Ok((StatusCode::CREATED, Json(ServiceView::from(&record))))
}

/// `GET /services`: lists live instances.
pub async fn list<C>(State(state): Shared<C>) -> ApiResult<Json<Vec<ServiceView>>>
where
    C: Clock + Send + Sync + 'static,
{
    let records = state.registry.list().await?;
    Ok(Json(records.iter().map(ServiceView::from).collect()))
}

/// `GET /services/{id}`.
pub async fn fetch<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ServiceView>>
where
    C: Clock + Send + Sync + 'static,
{
    let record = state.registry.get(parse_id(&raw_id)?).await?;
    Ok(Json(ServiceView::from(&record)))
}

/// `PUT /services/{id}`: partial update that leaves the TTL window alone.
pub async fn update<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateServiceBody>, JsonRejection>,
) -> ApiResult<Json<ServiceView>>
where
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let Json(body) = body?;
    let mut request = UpdateServiceRequest::new();
    if let Some(name) = body.name {
        request = request.with_name(name);
    }
    if let Some(url) = body.url {
        request = request.with_url(url);
    }
    match body.health_check_url {
        Some(Some(url)) => request = request.with_health_check_url(url),
        Some(None) => request = request.clear_health_check_url(),
        None => {}
    }
    if let Some(metadata) = body.metadata {
        request = request.with_metadata(metadata);
    }
    let record = state.registry.update(id, request).await?;
    Ok(Json(ServiceView::from(&record)))
}

/// `DELETE /services/{id}`.
pub async fn deregister<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode>
where
    C: Clock + Send + Sync + 'static,
{
    state.registry.deregister(parse_id(&raw_id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /services/{id}/heartbeat`: restarts the TTL window.
pub async fn heartbeat<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ServiceView>>
where
    C: Clock + Send + Sync + 'static,
{
    let record = state.registry.heartbeat(parse_id(&raw_id)?).await?;
    Ok(Json(ServiceView::from(&record)))
}

/// `GET /services/discovery/{name}`: every live instance with that name.
pub async fn discover<C>(
    State(state): Shared<C>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<ServiceView>>>
where
    C: Clock + Send + Sync + 'static,
{
    let records = state.registry.discover(&name).await?;
    Ok(Json(records.iter().map(ServiceView::from).collect()))
}
