//! Repository port for agent directory entries.

use crate::agent::domain::{Agent, AgentId, AgentName, AgentQuery, AgentUpdate, SnapshotScope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent repository operations.
pub type AgentRepositoryResult<T> = Result<T, AgentRepositoryError>;

/// Agent persistence contract.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Stores a new agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::DuplicateAgent`] when the identifier
    /// exists or [`AgentRepositoryError::DuplicateAgentName`] when the name
    /// is taken.
    async fn create(&self, agent: &Agent) -> AgentRepositoryResult<()>;

    /// Applies `update` to the stored agent in a single write and returns
    /// the result.
    ///
    /// Fields the update leaves out keep the value held by the store at
    /// write time, so concurrent partial updates never overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist or [`AgentRepositoryError::DuplicateAgentName`] when a rename
    /// collides.
    async fn update(
        &self,
        id: AgentId,
        update: &AgentUpdate,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Agent>;

    /// Finds an agent by identifier.
    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>>;

    /// Lists agents passing `query`, ordered by identifier.
    async fn list(&self, query: &AgentQuery) -> AgentRepositoryResult<Vec<Agent>>;

    /// Returns every agent in `scope`, ordered by identifier.
    ///
    /// The result is read in one atomic step; concurrent writes are either
    /// wholly visible or wholly absent.
    async fn snapshot(&self, scope: SnapshotScope) -> AgentRepositoryResult<Vec<Agent>>;

    /// Deletes an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist.
    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<()>;
}

/// Errors returned by agent repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRepositoryError {
    /// An agent with the same identifier already exists.
    #[error("duplicate agent identifier: {0}")]
    DuplicateAgent(AgentId),

    /// An agent with the same name already exists.
    #[error("duplicate agent name: {0}")]
    DuplicateAgentName(AgentName),

    /// The agent was not found.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
