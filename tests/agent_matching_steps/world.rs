//! Shared world state for agent matching BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use wayfinder::agent::{adapters::memory::InMemoryAgentRepository, services::AgentDirectoryService};
use wayfinder::capability::{
    adapters::memory::InMemoryCapabilityRepository, services::CapabilityCatalogService,
};
use wayfinder::matching::{domain::AgentMatch, services::AgentMatchingService};

/// Scenario world for agent matching behaviour tests.
pub struct MatchingWorld {
    /// Agent directory.
    pub directory:
        AgentDirectoryService<InMemoryAgentRepository, InMemoryCapabilityRepository, DefaultClock>,
    /// Capability catalog.
    pub catalog:
        CapabilityCatalogService<InMemoryCapabilityRepository, InMemoryAgentRepository, DefaultClock>,
    /// Matching engine.
    pub matcher: AgentMatchingService<InMemoryAgentRepository, InMemoryCapabilityRepository>,
    /// Result of the last ranking.
    pub ranking: Option<Vec<AgentMatch>>,
}

impl MatchingWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let agents = Arc::new(InMemoryAgentRepository::new());
        let capabilities = Arc::new(InMemoryCapabilityRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
            directory: AgentDirectoryService::new(
                Arc::clone(&agents),
                Arc::clone(&capabilities),
                Arc::clone(&clock),
            ),
            catalog: CapabilityCatalogService::new(
                Arc::clone(&capabilities),
                Arc::clone(&agents),
                clock,
            ),
            matcher: AgentMatchingService::new(agents, capabilities),
            ranking: None,
        }
    }

    /// Returns the last ranking.
    ///
    /// # Errors
    ///
    /// Returns an error when no ranking has been computed yet.
    pub fn ranking(&self) -> Result<&[AgentMatch], eyre::Report> {
        self.ranking
            .as_deref()
            .ok_or_else(|| eyre::eyre!("no ranking in scenario world"))
    }
}

impl Default for MatchingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MatchingWorld {
    MatchingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated capability list, ignoring blanks.
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}
