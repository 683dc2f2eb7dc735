//! Agent directory and matching endpoint tests.

use super::helpers::{TestApp, app, error_kind, field};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

async fn register(app: &TestApp, body: Value) -> String {
    let (status, created) = app.send(Method::POST, "/agents", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    field(&created, "agent_id").to_owned()
}

fn names(entries: &Value) -> Vec<&str> {
    entries
        .as_array()
        .map(|items| items.iter().map(|item| field(item, "name")).collect())
        .unwrap_or_default()
}

fn matched_names(entries: &Value) -> Vec<&str> {
    entries
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.pointer("/agent/name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_defaults_status_and_sorts_capabilities(app: TestApp) {
    let (status, body) = app
        .send(
            Method::POST,
            "/agents",
            Some(json!({
                "name": "mechanic",
                "version": "1.0.0",
                "url": "http://mechanic:7000",
                "capabilities": ["order_parts", "diagnose_engine", "order_parts"]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(field(&body, "status"), "active");
    assert_eq!(
        body.get("capabilities"),
        Some(&json!(["diagnose_engine", "order_parts"]))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_agent_name_conflicts(app: TestApp) {
    let body = json!({"name": "mechanic", "version": "1", "url": "http://m"});
    register(&app, body.clone()).await;

    let (status, error) = app.send(Method::POST, "/agents", Some(body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&error), "conflict");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_ranks_by_preference_then_priority(app: TestApp) {
    app.send(
        Method::POST,
        "/capabilities",
        Some(json!({"name": "repair_transmission", "priority": 9})),
    )
    .await;
    register(
        &app,
        json!({
            "name": "A", "version": "1", "url": "http://a",
            "capabilities": ["diagnose_engine", "order_parts"]
        }),
    )
    .await;
    register(
        &app,
        json!({
            "name": "B", "version": "1", "url": "http://b",
            "capabilities": ["diagnose_engine", "repair_transmission"]
        }),
    )
    .await;

    let (status, ranked) = app
        .send(
            Method::POST,
            "/agents/find",
            Some(json!({
                "required_capabilities": ["diagnose_engine"],
                "preferred_capabilities": ["repair_transmission", "order_parts"]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(matched_names(&ranked), vec!["B", "A"]);
    assert_eq!(ranked.pointer("/0/score"), Some(&json!(1)));
    assert_eq!(ranked.pointer("/0/priority_sum"), Some(&json!(9)));
    assert_eq!(ranked.pointer("/1/priority_sum"), Some(&json!(5)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_with_no_match_is_empty_success(app: TestApp) {
    register(
        &app,
        json!({
            "name": "C", "version": "1", "url": "http://c",
            "metadata": {"specialty": "brakes"},
            "capabilities": ["diagnose_engine"]
        }),
    )
    .await;

    for body in [
        json!({"required_capabilities": ["nonexistent_capability"]}),
        json!({
            "required_capabilities": ["diagnose_engine"],
            "metadata_filters": {"specialty": "engine"}
        }),
    ] {
        let (status, ranked) = app.send(Method::POST, "/agents/find", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ranked, json!([]));
    }
}

#[rstest]
#[case(json!({"metadata_filters": {"tags": ["a"]}}))]
#[case(json!({"metadata_filters": {"owner": null}}))]
#[case(json!({"required_capabilities": [""]}))]
#[case(json!({"required_capabilities": "diagnose_engine"}))]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_find_requests_are_rejected(app: TestApp, #[case] body: Value) {
    let (status, error) = app.send(Method::POST, "/agents/find", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&error), "validation_error");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_status_and_capability(app: TestApp) {
    register(
        &app,
        json!({"name": "a", "version": "1", "url": "http://a", "capabilities": ["x"]}),
    )
    .await;
    register(
        &app,
        json!({
            "name": "b", "version": "1", "url": "http://b",
            "status": "inactive", "capabilities": ["x"]
        }),
    )
    .await;

    let (_, inactive) = app
        .send(Method::GET, "/agents?status=inactive&capability=x", None)
        .await;
    let (_, all) = app.send(Method::GET, "/agents?capability=x", None).await;

    assert_eq!(names(&inactive), vec!["b"]);
    assert_eq!(all.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[case("/agents?status=retired")]
#[case("/agents?limit=0")]
#[case("/agents?limit=1001")]
#[case("/agents?skip=-1")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_list_parameters_are_rejected(app: TestApp, #[case] uri: &str) {
    let (status, error) = app.send(Method::GET, uri, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&error), "validation_error");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_and_delete_round_trip(app: TestApp) {
    let id = register(
        &app,
        json!({"name": "a", "version": "1", "url": "http://a"}),
    )
    .await;
    let uri = format!("/agents/{id}");

    let (status, updated) = app
        .send(Method::PUT, &uri, Some(json!({"status": "unavailable"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&updated, "status"), "unavailable");
    assert_eq!(field(&updated, "version"), "1");

    let (deleted, _) = app.send(Method::DELETE, &uri, None).await;
    let (missing, error) = app.send(Method::GET, &uri, None).await;
    assert_eq!(deleted, StatusCode::NO_CONTENT);
    assert_eq!(missing, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&error), "not_found");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn null_clears_optional_agent_fields(app: TestApp) {
    let id = register(
        &app,
        json!({
            "name": "a",
            "version": "1",
            "url": "http://a",
            "description": "first agent",
            "health_check_url": "http://a/health"
        }),
    )
    .await;

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/agents/{id}"),
            Some(json!({"description": null, "health_check_url": null})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated.get("description"), Some(&Value::Null));
    assert_eq!(updated.get("health_check_url"), Some(&Value::Null));
    assert_eq!(field(&updated, "url"), "http://a");
}
