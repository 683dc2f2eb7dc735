//! Agent directory behaviour over the `PostgreSQL` repository.

use crate::postgres::helpers::{BoxError, PostgresContext, context};
use axum::http::StatusCode;
use rstest::rstest;
use wayfinder::agent::{
    domain::{Agent, AgentQuery, AgentStatus},
    ports::AgentRepositoryError,
    services::{AgentDirectoryServiceError, RegisterAgentRequest, UpdateAgentRequest},
};
use wayfinder::api::ApiError;
use wayfinder::capability::domain::{CapabilityName, CapabilityQuery};
use wayfinder::capability::ports::CapabilityRepository;

fn request(name: &str) -> RegisterAgentRequest {
    RegisterAgentRequest::new(name, "1.0.0", format!("http://{name}:7000"))
}

async fn register(ctx: &PostgresContext, request: RegisterAgentRequest) -> Agent {
    ctx.directory
        .register(request)
        .await
        .expect("registration should succeed")
}

fn names(agents: &[Agent]) -> Vec<&str> {
    agents.iter().map(|agent| agent.name().as_str()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_register_round_trips_and_catalogues(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let created = register(
        &ctx,
        request("mechanic")
            .with_description("Engine diagnostics")
            .with_health_check_url("http://mechanic:7000/status")
            .with_capabilities(["replace_parts", "diagnose_engine"]),
    )
    .await;

    let fetched = ctx.directory.get(created.id()).await.expect("get");
    let catalogued = ctx
        .capabilities
        .list(&CapabilityQuery::default())
        .await
        .expect("catalog list");

    assert_eq!(fetched, created);
    assert_eq!(catalogued.len(), 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_duplicate_agent_name_maps_to_conflict(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    register(&ctx, request("mechanic")).await;

    let err = ctx
        .directory
        .register(request("mechanic"))
        .await
        .expect_err("duplicate name must be rejected");

    assert!(matches!(
        &err,
        AgentDirectoryServiceError::Repository(AgentRepositoryError::DuplicateAgentName(name))
            if name.as_str() == "mechanic"
    ));
    let api = ApiError::from(err);
    assert_eq!(api.status_code(), StatusCode::CONFLICT);
    assert_eq!(api.kind(), "conflict");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_rename_onto_taken_name_leaves_row_unchanged(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    register(&ctx, request("first")).await;
    let second = register(&ctx, request("second")).await;

    let result = ctx
        .directory
        .update(
            second.id(),
            UpdateAgentRequest::new()
                .with_name("first")
                .with_version("9.9.9"),
        )
        .await;

    assert!(matches!(
        result,
        Err(AgentDirectoryServiceError::Repository(
            AgentRepositoryError::DuplicateAgentName(_)
        ))
    ));
    let reloaded = ctx.directory.get(second.id()).await.expect("get");
    assert_eq!(reloaded, second);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_update_clears_fields_and_keeps_the_rest(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let created = register(
        &ctx,
        request("mechanic")
            .with_description("Engine diagnostics")
            .with_health_check_url("http://mechanic:7000/status")
            .with_capabilities(["diagnose_engine"]),
    )
    .await;

    ctx.clock.advance_secs(5);
    let updated = ctx
        .directory
        .update(
            created.id(),
            UpdateAgentRequest::new()
                .clear_description()
                .clear_health_check_url()
                .with_status(AgentStatus::Unavailable),
        )
        .await
        .expect("update");

    assert_eq!(updated.description(), None);
    assert_eq!(updated.health_check_url(), None);
    assert_eq!(updated.status(), AgentStatus::Unavailable);
    assert_eq!(updated.capabilities(), created.capabilities());
    assert_eq!(updated.created_at(), created.created_at());
    assert_eq!(ctx.directory.get(created.id()).await.expect("get"), updated);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_concurrent_partial_updates_keep_both_changes(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let created = register(&ctx, request("mechanic").with_capabilities(["x"])).await;

    let (deactivated, recapped) = tokio::join!(
        ctx.directory.update(
            created.id(),
            UpdateAgentRequest::new().with_status(AgentStatus::Inactive),
        ),
        ctx.directory
            .update(created.id(), UpdateAgentRequest::new().with_capabilities(["y"])),
    );
    deactivated.expect("status update");
    recapped.expect("capability update");

    let stored = ctx.directory.get(created.id()).await.expect("get");
    let y = CapabilityName::new("y").expect("valid capability");
    assert_eq!(stored.status(), AgentStatus::Inactive);
    assert!(stored.capabilities().contains(&y));
    assert_eq!(stored.capabilities().len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_snapshot_scope_and_list_filters(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    register(&ctx, request("a").with_capabilities(["x"])).await;
    register(
        &ctx,
        request("b")
            .with_capabilities(["x", "y"])
            .with_status(AgentStatus::Inactive),
    )
    .await;
    register(
        &ctx,
        request("c")
            .with_capabilities(["y"])
            .with_status(AgentStatus::Unavailable),
    )
    .await;

    let active = ctx.directory.snapshot(false).await.expect("snapshot");
    let mut everyone = ctx.directory.snapshot(true).await.expect("snapshot");
    everyone.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
    assert_eq!(names(&active), vec!["a"]);
    assert_eq!(names(&everyone), vec!["a", "b", "c"]);

    let mut with_x = ctx
        .directory
        .list(&AgentQuery {
            capability: Some(CapabilityName::new("x").expect("valid capability")),
            ..AgentQuery::default()
        })
        .await
        .expect("list");
    with_x.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
    assert_eq!(names(&with_x), vec!["a", "b"]);

    let inactive = ctx
        .directory
        .list(&AgentQuery {
            status: Some(AgentStatus::Inactive),
            ..AgentQuery::default()
        })
        .await
        .expect("list");
    assert_eq!(names(&inactive), vec!["b"]);
    Ok(())
}
