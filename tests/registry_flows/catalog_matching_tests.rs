//! Catalog edits and their effect on ranking.

use super::helpers::{Registries, registries};
use rstest::rstest;
use serde_json::Map;
use wayfinder::agent::services::RegisterAgentRequest;
use wayfinder::capability::{
    domain::CapabilityQuery,
    services::{CreateCapabilityRequest, UpdateCapabilityRequest},
};
use wayfinder::matching::domain::MatchRequest;

fn preferring(name: &str) -> MatchRequest {
    MatchRequest::parse(Vec::new(), vec![name.to_owned()], Map::new())
        .expect("valid match request")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_changes_apply_to_the_next_ranking(registries: Registries) {
    let created = registries
        .catalog
        .create(CreateCapabilityRequest::new("order_parts").with_priority(2))
        .await
        .expect("create capability");
    registries
        .directory
        .register(
            RegisterAgentRequest::new("A", "1", "http://a").with_capabilities(["order_parts"]),
        )
        .await
        .expect("register agent");

    let before = registries
        .matcher
        .find(&preferring("order_parts"), false)
        .await
        .expect("find");
    registries
        .catalog
        .update(
            created.capability.id(),
            UpdateCapabilityRequest::new().with_priority(7),
        )
        .await
        .expect("update capability");
    let after = registries
        .matcher
        .find(&preferring("order_parts"), false)
        .await
        .expect("find");

    assert_eq!(before.first().map(|entry| entry.priority_sum), Some(2));
    assert_eq!(after.first().map(|entry| entry.priority_sum), Some(7));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renamed_capability_leaves_agents_on_the_old_name(registries: Registries) {
    registries
        .directory
        .register(
            RegisterAgentRequest::new("A", "1", "http://a").with_capabilities(["order_parts"]),
        )
        .await
        .expect("register agent");
    let entry = registries
        .catalog
        .list(&CapabilityQuery::default())
        .await
        .expect("list")
        .into_iter()
        .next()
        .expect("auto-catalogued entry");

    registries
        .catalog
        .update(
            entry.capability.id(),
            UpdateCapabilityRequest::new().with_name("procure_parts"),
        )
        .await
        .expect("rename");

    let ranked = registries
        .matcher
        .find(&preferring("order_parts"), false)
        .await
        .expect("find");
    let first = ranked.first().expect("agent still eligible");
    assert_eq!((first.score, first.priority_sum), (1, 0));

    let renamed = registries
        .catalog
        .get(entry.capability.id())
        .await
        .expect("get");
    assert!(renamed.agents.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_agents_drop_out_of_rankings_and_details(registries: Registries) {
    let agent = registries
        .directory
        .register(
            RegisterAgentRequest::new("A", "1", "http://a").with_capabilities(["order_parts"]),
        )
        .await
        .expect("register agent");

    registries
        .directory
        .delete(agent.id())
        .await
        .expect("delete agent");

    let ranked = registries
        .matcher
        .find(&preferring("order_parts"), true)
        .await
        .expect("find");
    assert!(ranked.is_empty());
    let catalog = registries
        .catalog
        .list(&CapabilityQuery::default())
        .await
        .expect("list");
    assert!(catalog.iter().all(|details| details.agents.is_empty()));
    assert_eq!(catalog.len(), 1);
}
