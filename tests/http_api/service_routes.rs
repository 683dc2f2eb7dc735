//! Service registry endpoint tests.

use super::helpers::{TestApp, app, error_kind, field};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

async fn register(app: &TestApp, body: Value) -> String {
    let (status, created) = app.send(Method::POST, "/services", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    field(&created, "service_id").to_owned()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_returns_created_record(app: TestApp) {
    let (status, body) = app
        .send(
            Method::POST,
            "/services",
            Some(json!({
                "name": "orders",
                "url": "http://orders:8000",
                "metadata": {"zone": "eu"}
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(field(&body, "name"), "orders");
    assert_eq!(body.get("ttl_seconds"), Some(&json!(60)));
    assert_eq!(body.pointer("/metadata/zone"), Some(&json!("eu")));
    assert_eq!(body.get("health"), Some(&Value::Null));
}

#[rstest]
#[case(json!({"name": "", "url": "http://orders"}))]
#[case(json!({"name": "orders", "url": "orders"}))]
#[case(json!({"name": "orders", "url": "http://orders", "ttl_seconds": 0}))]
#[case(json!({"url": "http://orders"}))]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_registration_is_bad_request(app: TestApp, #[case] body: Value) {
    let (status, error) = app.send(Method::POST, "/services", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&error), "validation_error");
    let (_, listed) = app.send(Method::GET, "/services", None).await;
    assert_eq!(listed, json!([]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_is_bad_request(app: TestApp) {
    let (status, error) = app.send_raw(Method::POST, "/services", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&error), "validation_error");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn heartbeat_keeps_service_discoverable(app: TestApp) {
    let id = register(
        &app,
        json!({"name": "S", "url": "http://s", "ttl_seconds": 60}),
    )
    .await;

    app.clock.advance_secs(59);
    let (status, _) = app
        .send(Method::PUT, &format!("/services/{id}/heartbeat"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance_secs(58);
    let (_, found) = app.send(Method::GET, "/services/discovery/S", None).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    app.clock.advance_secs(13);
    let (status, expired) = app.send(Method::GET, "/services/discovery/S", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(expired, json!([]));

    let (status, error) = app
        .send(Method::PUT, &format!("/services/{id}/heartbeat"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&error), "not_found");
}

#[rstest]
#[case("/services/not-a-uuid")]
#[case("/services/00000000-0000-0000-0000-000000000000")]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_service_ids_are_not_found(app: TestApp, #[case] uri: &str) {
    let (status, error) = app.send(Method::GET, uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&error), "not_found");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_fields_in_place(app: TestApp) {
    let id = register(&app, json!({"name": "orders", "url": "http://orders"})).await;

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/services/{id}"),
            Some(json!({"url": "https://orders.internal"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&updated, "url"), "https://orders.internal");
    assert_eq!(field(&updated, "name"), "orders");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deregister_then_again_is_not_found(app: TestApp) {
    let id = register(&app, json!({"name": "orders", "url": "http://orders"})).await;
    let uri = format!("/services/{id}");

    let (first, body) = app.send(Method::DELETE, &uri, None).await;
    let (second, _) = app.send(Method::DELETE, &uri, None).await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(second, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn discovery_returns_every_live_instance(app: TestApp) {
    register(&app, json!({"name": "orders", "url": "http://orders-1"})).await;
    register(&app, json!({"name": "orders", "url": "http://orders-2"})).await;
    register(&app, json!({"name": "billing", "url": "http://billing"})).await;

    let (_, found) = app.send(Method::GET, "/services/discovery/orders", None).await;
    let urls: Vec<&str> = found
        .as_array()
        .map(|entries| entries.iter().map(|entry| field(entry, "url")).collect())
        .unwrap_or_default();

    assert_eq!(urls, vec!["http://orders-1", "http://orders-2"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn null_clears_health_check_url_and_absence_keeps_it(app: TestApp) {
    let id = register(
        &app,
        json!({"name": "orders", "url": "http://orders", "health_check_url": "http://orders/health"}),
    )
    .await;
    let uri = format!("/services/{id}");

    let (_, kept) = app
        .send(Method::PUT, &uri, Some(json!({"name": "orders-v2"})))
        .await;
    assert_eq!(field(&kept, "health_check_url"), "http://orders/health");

    let (status, cleared) = app
        .send(Method::PUT, &uri, Some(json!({"health_check_url": null})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared.get("health_check_url"), Some(&Value::Null));
    assert_eq!(field(&cleared, "name"), "orders-v2");
}
