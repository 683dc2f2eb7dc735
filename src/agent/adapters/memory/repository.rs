//! In-memory repository for agent directory entries.

use crate::agent::{
    domain::{Agent, AgentId, AgentName, AgentQuery, AgentUpdate, SnapshotScope},
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory agent repository.
///
/// Agents are kept in identifier order so listings and snapshots need no
/// extra sort.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRepository {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    agents: BTreeMap<AgentId, Agent>,
    name_index: HashMap<AgentName, AgentId>,
}

impl InMemoryAgentRepository {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> AgentRepositoryError {
    AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn create(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if state.agents.contains_key(&agent.id()) {
            return Err(AgentRepositoryError::DuplicateAgent(agent.id()));
        }
        if state.name_index.contains_key(agent.name()) {
            return Err(AgentRepositoryError::DuplicateAgentName(
                agent.name().clone(),
            ));
        }

        state.name_index.insert(agent.name().clone(), agent.id());
        state.agents.insert(agent.id(), agent.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: AgentId,
        update: &AgentUpdate,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Agent> {
        let mut state = self.state.write().map_err(lock_error)?;

        let mut agent = state
            .agents
            .get(&id)
            .cloned()
            .ok_or(AgentRepositoryError::NotFound(id))?;
        let previous_name = agent.name().clone();
        agent.apply_update(update.clone(), at);

        if *agent.name() != previous_name {
            if state.name_index.contains_key(agent.name()) {
                return Err(AgentRepositoryError::DuplicateAgentName(
                    agent.name().clone(),
                ));
            }
            state.name_index.remove(&previous_name);
            state.name_index.insert(agent.name().clone(), id);
        }

        state.agents.insert(id, agent.clone());
        Ok(agent)
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.agents.get(&id).cloned())
    }

    async fn list(&self, query: &AgentQuery) -> AgentRepositoryResult<Vec<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(query.page.apply(
            state
                .agents
                .values()
                .filter(|agent| query.matches(agent))
                .cloned(),
        ))
    }

    async fn snapshot(&self, scope: SnapshotScope) -> AgentRepositoryResult<Vec<Agent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .agents
            .values()
            .filter(|agent| scope.includes(agent))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .agents
            .remove(&id)
            .ok_or(AgentRepositoryError::NotFound(id))?;
        state.name_index.remove(removed.name());
        Ok(())
    }
}
