//! Concurrent writers against shared in-memory stores.

use std::sync::Arc;

use super::helpers::{Registries, registries};
use rstest::rstest;
use wayfinder::agent::{
    domain::AgentQuery,
    ports::AgentRepositoryError,
    services::{AgentDirectoryServiceError, RegisterAgentRequest},
};
use wayfinder::capability::domain::CapabilityQuery;
use wayfinder::service_registry::services::RegisterServiceRequest;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_registrations_keep_names_unique(registries: Registries) {
    let directory = Arc::new(registries.directory.clone());
    let attempts: Vec<_> = (0..8)
        .map(|attempt| {
            let service = Arc::clone(&directory);
            tokio::spawn(async move {
                service
                    .register(
                        RegisterAgentRequest::new("mechanic", "1", format!("http://m{attempt}"))
                            .with_capabilities(["diagnose_engine"]),
                    )
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in attempts {
        match handle.await.expect("task should not panic") {
            Ok(_) => created += 1,
            Err(AgentDirectoryServiceError::Repository(
                AgentRepositoryError::DuplicateAgentName(_),
            )) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!((created, conflicts), (1, 7));
    let listed = directory.list(&AgentQuery::default()).await.expect("list");
    assert_eq!(listed.len(), 1);
    let catalogued = registries
        .catalog
        .list(&CapabilityQuery::default())
        .await
        .expect("catalog list");
    assert_eq!(catalogued.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_heartbeats_keep_one_record(registries: Registries) {
    let registry = Arc::new(registries.registry.clone());
    let record = registry
        .register(RegisterServiceRequest::new("orders", "http://orders").with_ttl_seconds(10))
        .await
        .expect("register");

    registries.clock.advance_secs(5);
    let beats: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&registry);
            let id = record.id();
            tokio::spawn(async move { service.heartbeat(id).await })
        })
        .collect();
    for handle in beats {
        handle
            .await
            .expect("task should not panic")
            .expect("heartbeat within TTL succeeds");
    }

    registries.clock.advance_secs(9);
    let found = registry.discover("orders").await.expect("discover");
    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(|r| r.id()), Some(record.id()));
}
