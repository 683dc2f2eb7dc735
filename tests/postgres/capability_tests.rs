//! Capability catalog behaviour over the `PostgreSQL` repository.

use crate::postgres::helpers::{BoxError, PostgresContext, context};
use axum::http::StatusCode;
use rstest::rstest;
use wayfinder::agent::{domain::AgentName, services::RegisterAgentRequest};
use wayfinder::api::ApiError;
use wayfinder::capability::{
    domain::CapabilityQuery,
    ports::CapabilityRepositoryError,
    services::{
        CapabilityCatalogServiceError, CapabilityDetails, CreateCapabilityRequest,
        UpdateCapabilityRequest,
    },
};
use wayfinder::common::Page;

fn names(details: &[CapabilityDetails]) -> Vec<&str> {
    details
        .iter()
        .map(|entry| entry.capability.name().as_str())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_duplicate_capability_name_maps_to_conflict(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    ctx.catalog
        .create(CreateCapabilityRequest::new("translate"))
        .await
        .expect("create");

    let err = ctx
        .catalog
        .create(CreateCapabilityRequest::new("translate").with_priority(9))
        .await
        .expect_err("duplicate name must be rejected");

    assert!(matches!(
        &err,
        CapabilityCatalogServiceError::Repository(
            CapabilityRepositoryError::DuplicateCapabilityName(name)
        ) if name.as_str() == "translate"
    ));
    let api = ApiError::from(err);
    assert_eq!(api.status_code(), StatusCode::CONFLICT);
    assert_eq!(api.kind(), "conflict");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_rename_onto_existing_name_conflicts(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    ctx.catalog
        .create(CreateCapabilityRequest::new("a"))
        .await
        .expect("create");
    let b = ctx
        .catalog
        .create(CreateCapabilityRequest::new("b"))
        .await
        .expect("create");

    let result = ctx
        .catalog
        .update(b.capability.id(), UpdateCapabilityRequest::new().with_name("a"))
        .await;

    assert!(matches!(
        result,
        Err(CapabilityCatalogServiceError::Repository(
            CapabilityRepositoryError::DuplicateCapabilityName(_)
        ))
    ));
    let reloaded = ctx.catalog.get(b.capability.id()).await.expect("get");
    assert_eq!(reloaded.capability.name().as_str(), "b");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_update_clears_category_and_keeps_priority(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let created = ctx
        .catalog
        .create(
            CreateCapabilityRequest::new("translate")
                .with_description("text to text")
                .with_category("nlp")
                .with_priority(8),
        )
        .await
        .expect("create");

    let updated = ctx
        .catalog
        .update(
            created.capability.id(),
            UpdateCapabilityRequest::new().clear_category(),
        )
        .await
        .expect("update");

    assert_eq!(updated.capability.category(), None);
    assert_eq!(updated.capability.description(), Some("text to text"));
    assert_eq!(updated.capability.priority().value(), 8);
    assert_eq!(
        ctx.catalog.get(created.capability.id()).await.expect("get"),
        updated
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_list_filters_by_category_and_pages_by_name(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    for (name, category) in [("d", "x"), ("b", "x"), ("a", "y"), ("c", "x")] {
        ctx.catalog
            .create(CreateCapabilityRequest::new(name).with_category(category))
            .await
            .expect("create");
    }

    let in_x = ctx
        .catalog
        .list(&CapabilityQuery {
            category: Some("x".to_owned()),
            page: None,
        })
        .await
        .expect("list");
    let window = ctx
        .catalog
        .list(&CapabilityQuery {
            category: Some("x".to_owned()),
            page: Some(Page::new(1, 1).expect("valid page")),
        })
        .await
        .expect("list");

    assert_eq!(names(&in_x), vec!["b", "c", "d"]);
    assert_eq!(names(&window), vec!["c"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_details_list_referencing_agents(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    for name in ["zeta", "alpha"] {
        ctx.directory
            .register(
                RegisterAgentRequest::new(name, "1", format!("http://{name}"))
                    .with_capabilities(["translate"]),
            )
            .await
            .expect("registration should succeed");
    }

    let listed = ctx
        .catalog
        .list(&CapabilityQuery::default())
        .await
        .expect("list");
    let agents: Vec<&str> = listed
        .iter()
        .flat_map(|entry| entry.agents.iter().map(AgentName::as_str))
        .collect();

    assert_eq!(names(&listed), vec!["translate"]);
    assert_eq!(agents, vec!["alpha", "zeta"]);
    Ok(())
}
