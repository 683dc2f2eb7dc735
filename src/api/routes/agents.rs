//! Agent directory and matching endpoints.

use super::{ApiResult, Shared};
use crate::agent::{
    domain::{AgentId, AgentQuery, AgentStatus},
    services::{RegisterAgentRequest, UpdateAgentRequest},
};
use crate::api::{
    ApiError,
    views::{AgentListParams, AgentView, FindAgentsBody, MatchView, RegisterAgentBody, UpdateAgentBody},
};
use crate::capability::domain::CapabilityName;
use crate::common::Page;
use crate::matching::domain::MatchRequest;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use mockable::Clock;

fn parse_id(raw: &str) -> ApiResult<AgentId> {
    raw.parse().map_err(|_| ApiError::unknown_id("agent", raw))
}

fn parse_query(params: AgentListParams) -> ApiResult<AgentQuery> {
    let status = params
        .status
        .as_deref()
        .map(AgentStatus::try_from)
        .transpose()
        .map_err(|err| ApiError::Validation(err.to_string()))?;
    let capability = params
        .capability
        .map(CapabilityName::new)
        .transpose()
        .map_err(|err| ApiError::Validation(err.to_string()))?;
    let page = Page::new(
        params.skip.unwrap_or(0),
        params.limit.unwrap_or(Page::DEFAULT_LIMIT),
    )?;
    Ok(AgentQuery {
        status,
        capability,
        page,
    })
}

/// `POST /agents`: registers an agent and catalogues its capabilities.
pub async fn register<C>(
    State(state): Shared<C>,
    body: Result<Json<RegisterAgentBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AgentView>)>
where
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = body?;
    let mut request = RegisterAgentRequest::new(body.name, body.version, body.url)
        .with_status(body.status)
        .with_metadata(body.metadata)
        .with_capabilities(body.capabilities);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(url) = body.health_check_url {
        request = request.with_health_check_url(url);
    }
    let agent = state.agents.register(request).await?;
    Ok((StatusCode::CREATED, Json(AgentView::from(&agent))))
}

/// `GET /agents?status=&capability=&skip=&limit=`.
pub async fn list<C>(
    State(state): Shared<C>,
    params: Result<Query<AgentListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<AgentView>>>
where
    C: Clock + Send + Sync + 'static,
{
    let Query(params) = params?;
    let agents = state.agents.list(&parse_query(params)?).await?;
    Ok(Json(agents.iter().map(AgentView::from).collect()))
}

/// `GET /agents/{id}`.
pub async fn fetch<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<AgentView>>
where
    C: Clock + Send + Sync + 'static,
{
    let agent = state.agents.get(parse_id(&raw_id)?).await?;
    Ok(Json(AgentView::from(&agent)))
}

/// `PUT /agents/{id}`: partial update.
pub async fn update<C>(
    State(state): Shared<C>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateAgentBody>, JsonRejection>,
) -> ApiResult<Json<AgentView>>
where
    C: Clock + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let Json(body) = body?;
    let UpdateAgentBody {
        name,
        description,
        version,
        url,
        health_check_url,
        status,
        metadata,
        capabilities,
    } = body;

    let mut request = UpdateAgentRequest::new();
    if let Some(value) = name {
        request = request.with_name(value);
    }
    match description {
        Some(Some(value)) => request = request.with_description(value),
        Some(None) => request = request.clear_description(),
        None => {}
    }
    if let Some(value) = version {
        request = request.with_version(value);
    }
    if let Some(value) = url {
        request = request.with_url(value);
    }
    match health_check_url {
        Some(Some(value)) => request = request.with_health_check_url(value),
        Some(None) => request = request.clear_health_check_url(),
        None => {}
    }
    if let Some(value) = status {
        request = request.with_status(value);
    }
    if let Some(value) = metadata {
        request = request.with_metadata(value);
    }
    if let Some(value) = capabilities {
        request = request.with_capabilities(value);
    }

    let agent = state.agents.update(id, request).await?;
    Ok(Json(AgentView::from(&agent)))
}

/// `DELETE /agents/{id}`.
pub async fn delete<C>(State(state): Shared<C>, Path(raw_id): Path<String>) -> ApiResult<StatusCode>
where
    C: Clock + Send + Sync + 'static,
{
    state.agents.delete(parse_id(&raw_id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /agents/find`: ranked agents for a task, possibly empty.
pub async fn find<C>(
    State(state): Shared<C>,
    body: Result<Json<FindAgentsBody>, JsonRejection>,
) -> ApiResult<Json<Vec<MatchView>>>
where
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = body?;
    let request = MatchRequest::parse(
        body.required_capabilities,
        body.preferred_capabilities,
        body.metadata_filters,
    )?;
    let ranked = state.matcher.find(&request, body.include_inactive).await?;
    Ok(Json(ranked.iter().map(MatchView::from).collect()))
}
