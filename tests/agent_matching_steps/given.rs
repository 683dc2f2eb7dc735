//! Given steps for agent matching BDD scenarios.

use super::world::{MatchingWorld, run_async, split_names};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::{Map, Value};
use wayfinder::agent::{domain::AgentStatus, services::RegisterAgentRequest};
use wayfinder::capability::services::CreateCapabilityRequest;

fn register(
    world: &MatchingWorld,
    request: RegisterAgentRequest,
) -> Result<(), eyre::Report> {
    run_async(world.directory.register(request)).wrap_err("register agent for scenario")?;
    Ok(())
}

fn agent(name: &str, capabilities: &str) -> RegisterAgentRequest {
    RegisterAgentRequest::new(name, "1.0.0", format!("http://{name}:7000"))
        .with_capabilities(split_names(capabilities))
}

#[given(r#"the capability "{name}" has priority {priority:i64}"#)]
fn capability_with_priority(
    world: &mut MatchingWorld,
    name: String,
    priority: i64,
) -> Result<(), eyre::Report> {
    run_async(
        world
            .catalog
            .create(CreateCapabilityRequest::new(name).with_priority(priority)),
    )
    .wrap_err("create capability for scenario")?;
    Ok(())
}

#[given(r#"an active agent "{name}" with capabilities "{capabilities}""#)]
fn active_agent(
    world: &mut MatchingWorld,
    name: String,
    capabilities: String,
) -> Result<(), eyre::Report> {
    register(world, agent(&name, &capabilities))
}

#[given(r#"an inactive agent "{name}" with capabilities "{capabilities}""#)]
fn inactive_agent(
    world: &mut MatchingWorld,
    name: String,
    capabilities: String,
) -> Result<(), eyre::Report> {
    register(
        world,
        agent(&name, &capabilities).with_status(AgentStatus::Inactive),
    )
}

#[given(r#"a specialist agent "{name}" for "{specialty}" with capabilities "{capabilities}""#)]
fn specialist_agent(
    world: &mut MatchingWorld,
    name: String,
    specialty: String,
    capabilities: String,
) -> Result<(), eyre::Report> {
    let mut metadata = Map::new();
    metadata.insert("specialty".to_owned(), Value::String(specialty));
    register(world, agent(&name, &capabilities).with_metadata(metadata))
}
