//! Fetches the matching inputs and hands them to [`rank`].

use crate::agent::{
    domain::SnapshotScope,
    ports::{AgentRepository, AgentRepositoryError},
};
use crate::capability::{
    domain::CapabilityName,
    ports::{CapabilityRepository, CapabilityRepositoryError},
};
use crate::matching::domain::{AgentMatch, MatchRequest, PriorityTable, rank};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while gathering matching inputs.
///
/// Both variants are store failures; they are surfaced instead of an empty
/// ranking.
#[derive(Debug, Error)]
pub enum AgentMatchingServiceError {
    /// The agent snapshot could not be read.
    #[error(transparent)]
    Directory(#[from] AgentRepositoryError),
    /// Capability priorities could not be read.
    #[error(transparent)]
    Catalog(#[from] CapabilityRepositoryError),
}

/// Result type for matching operations.
pub type AgentMatchingServiceResult<T> = Result<T, AgentMatchingServiceError>;

/// Agent matching orchestration.
pub struct AgentMatchingService<A, K>
where
    A: AgentRepository + ?Sized,
    K: CapabilityRepository + ?Sized,
{
    agents: Arc<A>,
    catalog: Arc<K>,
}

impl<A, K> Clone for AgentMatchingService<A, K>
where
    A: AgentRepository + ?Sized,
    K: CapabilityRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            agents: Arc::clone(&self.agents),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<A, K> AgentMatchingService<A, K>
where
    A: AgentRepository + ?Sized,
    K: CapabilityRepository + ?Sized,
{
    /// Creates a matching service.
    #[must_use]
    pub const fn new(agents: Arc<A>, catalog: Arc<K>) -> Self {
        Self { agents, catalog }
    }

    /// Ranks agents for `request`.
    ///
    /// `include_inactive` widens the snapshot to every agent; eligibility
    /// still requires the `active` status.
    ///
    /// # Errors
    ///
    /// Returns [`AgentMatchingServiceError`] when either store fails.
    pub async fn find(
        &self,
        request: &MatchRequest,
        include_inactive: bool,
    ) -> AgentMatchingServiceResult<Vec<AgentMatch>> {
        let scope = SnapshotScope::from_include_inactive(include_inactive);
        let snapshot = self.agents.snapshot(scope).await?;
        let preferred: Vec<CapabilityName> = request.preferred().iter().cloned().collect();
        let priorities: PriorityTable = self
            .catalog
            .find_by_names(&preferred)
            .await?
            .iter()
            .collect();

        let ranked = rank(request, &snapshot, &priorities);
        debug!(
            candidates = snapshot.len(),
            matched = ranked.len(),
            "agents ranked"
        );
        Ok(ranked)
    }
}
