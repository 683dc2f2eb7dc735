//! Capability catalog endpoints.

use super::{ApiResult, Shared};
use crate::api::{
    ApiError,
    views::{CapabilityListParams, CapabilityView, CreateCapabilityBody, UpdateCapabilityBody},
};
use crate::capability::{
    domain::{CapabilityId, CapabilityQuery},
    services::{CreateCapabilityRequest, UpdateCapabilityRequest},
};
use crate::common::Page;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use mockable::Clock;

fn parse_id(raw: &str) -> ApiResult<CapabilityId> {
    raw.parse()
        .map_err(|_| ApiError::unknown_id("capability", raw))
}

/// `POST /capabilities`.
pub async fn create<C>(
    State(state): Shared<C>,
    body: Result<Json<CreateCapabilityBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CapabilityView>)>
where
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = body?;
    let mut request = CreateCapabilityRequest::new(body.name).with_metadata(body.metadata);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(category) = body.category {
        request = request.with_category(category);
    }
    if let Some(priority) = body.priority {
        request = request.with_priority(priority);
    }
    let details = state.catalog.create(request).await?;
    Ok((StatusCode::CREATED, Json(CapabilityView::from(details))))
}

/// `GET /capabilities?category=&skip=&limit=`, ordered by name.
pub async fn list<C>(
    State(state): Shared<C>,
    params: Result<Query<CapabilityListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<CapabilityView>>>
where
    C: Clock + Send + Sync + 'static,
{
    let Query(params) = params?;
    let query = CapabilityQuery {
        category: params.category,
        page: Some(Page::new(
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(Page::DEFAULT_LIMIT),
        )?),
    };
    let entries = state.catalog.list(&query).await?;
    Ok(Json(entries.into_iter().map(CapabilityView::from).collect()))
}

/// `GET /capabilities/{id}`.
pub async fn fetch<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<CapabilityView>>
where
    C: Clock + Send + Sync + 'static,
{
    let details = state.catalog.get(parse_id(&raw_id)?).await?;
    Ok(Json(CapabilityView::from(details)))
}

/// `PUT /capabilities/{id}`: partial update; agents are not rewritten.
pub async fn update<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateCapabilityBody>, JsonRejection>,
) -> ApiResult<Json<CapabilityView>>
where
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let Json(body) = body?;
    let mut request = UpdateCapabilityRequest::new();
    if let Some(name) = body.name {
        request = request.with_name(name);
    }
    match body.description {
        Some(Some(description)) => request = request.with_description(description),
        Some(None) => request = request.clear_description(),
        None => {}
    }
    match body.category {
        Some(Some(category)) => request = request.with_category(category),
        Some(None) => request = request.clear_category(),
        None => {}
    }
    if let Some(priority) = body.priority {
        request = request.with_priority(priority);
    }
    if let Some(metadata) = body.metadata {
        request = request.with_metadata(metadata);
    }
    let details = state.catalog.update(id, request).await?;
    Ok(Json(CapabilityView::from(details)))
}

/// `DELETE /capabilities/{id}`; agents keep the name.
pub async fn delete<C>(State(state): Shared<C>, Path(raw_id): Path<String>) -> ApiResult<StatusCode>
where
    C: Clock + Send + Sync + 'static,
{
    state.catalog.delete(parse_id(&raw_id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
