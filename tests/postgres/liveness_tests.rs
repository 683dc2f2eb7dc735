//! TTL and heartbeat behaviour of the `PostgreSQL` liveness store.

use crate::postgres::helpers::{BoxError, PostgresContext, context};
use mockable::Clock;
use rstest::rstest;
use serde_json::json;
use wayfinder::common::Metadata;
use wayfinder::service_registry::{
    ports::LivenessStore,
    services::{RegisterServiceRequest, ServiceRegistryServiceError, UpdateServiceRequest},
};

fn gateway() -> RegisterServiceRequest {
    RegisterServiceRequest::new("gateway", "http://gateway:8080")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_heartbeat_after_expiry_does_not_resurrect(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let record = ctx
        .registry
        .register(gateway().with_ttl_seconds(10))
        .await
        .expect("registration should succeed");

    ctx.clock.advance_secs(10);
    let result = ctx.registry.heartbeat(record.id()).await;

    assert!(matches!(
        result,
        Err(ServiceRegistryServiceError::NotFound(id)) if id == record.id()
    ));
    assert!(matches!(
        ctx.registry.get(record.id()).await,
        Err(ServiceRegistryServiceError::NotFound(_))
    ));
    assert!(ctx.registry.discover("gateway").await.expect("discover").is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_heartbeat_within_window_extends_expiry(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let record = ctx
        .registry
        .register(gateway())
        .await
        .expect("registration should succeed");

    ctx.clock.advance_secs(59);
    let refreshed = ctx
        .registry
        .heartbeat(record.id())
        .await
        .expect("heartbeat within TTL succeeds");
    assert_eq!(refreshed.last_heartbeat_at(), ctx.clock.utc());
    assert_eq!(refreshed.registered_at(), record.registered_at());

    ctx.clock.advance_secs(59);
    assert_eq!(ctx.registry.discover("gateway").await.expect("discover").len(), 1);
    ctx.clock.advance_secs(1);
    assert!(ctx.registry.discover("gateway").await.expect("discover").is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_update_does_not_extend_ttl(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let mut metadata = Metadata::new();
    metadata.insert("zone".to_owned(), json!("eu-west-1"));
    let record = ctx
        .registry
        .register(
            gateway()
                .with_health_check_url("http://gateway:8080/health")
                .with_metadata(metadata.clone()),
        )
        .await
        .expect("registration should succeed");

    ctx.clock.advance_secs(30);
    let updated = ctx
        .registry
        .update(
            record.id(),
            UpdateServiceRequest::new()
                .with_url("https://gateway.internal")
                .clear_health_check_url(),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.url().as_str(), "https://gateway.internal");
    assert_eq!(updated.health_check_url(), None);
    assert_eq!(updated.metadata(), &metadata);
    assert_eq!(updated.expires_at(), record.expires_at());
    assert_eq!(updated.updated_at(), ctx.clock.utc());

    ctx.clock.advance_secs(30);
    assert!(matches!(
        ctx.registry.get(record.id()).await,
        Err(ServiceRegistryServiceError::NotFound(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_purge_removes_only_expired_rows(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    ctx.registry
        .register(gateway().with_ttl_seconds(5))
        .await
        .expect("short-lived registration");
    let survivor = ctx
        .registry
        .register(gateway().with_ttl_seconds(500))
        .await
        .expect("long-lived registration");

    ctx.clock.advance_secs(5);
    assert_eq!(ctx.registry.purge_expired().await.expect("purge"), 1);
    assert_eq!(ctx.registry.purge_expired().await.expect("second purge"), 0);

    ctx.clock.advance_secs(-5);
    let remaining = ctx
        .liveness
        .scan_live(ctx.clock.utc())
        .await
        .expect("scan");
    let ids: Vec<_> = remaining.iter().map(|record| record.id()).collect();
    assert_eq!(ids, vec![survivor.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_discovery_lists_every_live_instance(
    #[future] context: Result<Option<PostgresContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    for url in ["http://gateway-a:8080", "http://gateway-b:8080"] {
        ctx.registry
            .register(RegisterServiceRequest::new("gateway", url))
            .await
            .expect("registration should succeed");
    }
    ctx.registry
        .register(RegisterServiceRequest::new("billing", "http://billing:8080"))
        .await
        .expect("registration should succeed");

    let found = ctx.registry.discover("gateway").await.expect("discover");
    let urls: Vec<&str> = found.iter().map(|record| record.url().as_str()).collect();

    assert_eq!(urls.len(), 2);
    assert!(urls.contains(&"http://gateway-a:8080"));
    assert!(urls.contains(&"http://gateway-b:8080"));
    Ok(())
}
