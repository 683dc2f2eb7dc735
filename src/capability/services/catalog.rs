//! Service layer for capability definitions.
//!
//! The `agents` list returned with each capability is computed from the
//! agent directory on every read and never stored in the catalog.

use crate::agent::{
    domain::{Agent, AgentName, SnapshotScope},
    ports::{AgentRepository, AgentRepositoryError},
};
use crate::capability::{
    domain::{
        Capability, CapabilityDomainError, CapabilityDraft, CapabilityId, CapabilityName,
        CapabilityQuery, CapabilityUpdate, Priority, normalize_category,
    },
    ports::{CapabilityRepository, CapabilityRepositoryError},
};
use crate::common::Metadata;
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for defining a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCapabilityRequest {
    name: String,
    description: Option<String>,
    category: Option<String>,
    priority: Option<i64>,
    metadata: Metadata,
}

impl CreateCapabilityRequest {
    /// Creates a request with default priority.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            priority: None,
            metadata: Metadata::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the priority weight.
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn validate(self) -> Result<CapabilityDraft, CapabilityDomainError> {
        Ok(CapabilityDraft {
            name: CapabilityName::new(self.name)?,
            description: self.description,
            category: normalize_category(self.category)?,
            priority: self.priority.map(Priority::new).transpose()?.unwrap_or_default(),
            metadata: self.metadata,
        })
    }
}

/// Request payload for a partial capability update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCapabilityRequest {
    name: Option<String>,
    description: Option<Option<String>>,
    category: Option<Option<String>>,
    priority: Option<i64>,
    metadata: Option<Metadata>,
}

impl UpdateCapabilityRequest {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name. Agents keep referencing the old name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Removes the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Replaces the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(Some(category.into()));
        self
    }

    /// Removes the category.
    #[must_use]
    pub fn clear_category(mut self) -> Self {
        self.category = Some(None);
        self
    }

    /// Replaces the priority weight.
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn validate(self) -> Result<CapabilityUpdate, CapabilityDomainError> {
        Ok(CapabilityUpdate {
            name: self.name.map(CapabilityName::new).transpose()?,
            description: self.description,
            category: self.category.map(normalize_category).transpose()?,
            priority: self.priority.map(Priority::new).transpose()?,
            metadata: self.metadata,
        })
    }
}

/// A capability together with the agents currently advertising it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityDetails {
    /// The catalog entry.
    pub capability: Capability,
    /// Names of agents whose capability set contains the entry's name,
    /// sorted.
    pub agents: Vec<AgentName>,
}

impl CapabilityDetails {
    fn resolve(capability: Capability, agents: &[Agent]) -> Self {
        let mut names: Vec<AgentName> = agents
            .iter()
            .filter(|agent| agent.capabilities().contains(capability.name()))
            .map(|agent| agent.name().clone())
            .collect();
        names.sort();
        Self {
            capability,
            agents: names,
        }
    }
}

/// Service-level errors for catalog operations.
#[derive(Debug, Error)]
pub enum CapabilityCatalogServiceError {
    /// Input validation failed; nothing was written.
    #[error(transparent)]
    Domain(#[from] CapabilityDomainError),
    /// The capability does not exist.
    #[error("capability {0} not found")]
    NotFound(CapabilityId),
    /// The catalog repository failed or rejected the write.
    #[error(transparent)]
    Repository(CapabilityRepositoryError),
    /// Reading the agent directory failed.
    #[error(transparent)]
    Directory(#[from] AgentRepositoryError),
}

impl From<CapabilityRepositoryError> for CapabilityCatalogServiceError {
    fn from(err: CapabilityRepositoryError) -> Self {
        match err {
            CapabilityRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for catalog operations.
pub type CapabilityCatalogServiceResult<T> = Result<T, CapabilityCatalogServiceError>;

/// Capability catalog orchestration.
pub struct CapabilityCatalogService<K, A, C>
where
    K: CapabilityRepository + ?Sized,
    A: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    catalog: Arc<K>,
    agents: Arc<A>,
    clock: Arc<C>,
}

impl<K, A, C> Clone for CapabilityCatalogService<K, A, C>
where
    K: CapabilityRepository + ?Sized,
    A: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            agents: Arc::clone(&self.agents),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K, A, C> CapabilityCatalogService<K, A, C>
where
    K: CapabilityRepository + ?Sized,
    A: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a catalog service.
    #[must_use]
    pub const fn new(catalog: Arc<K>, agents: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            catalog,
            agents,
            clock,
        }
    }

    /// Defines a new capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityCatalogServiceError::Domain`] for invalid input or
    /// [`CapabilityCatalogServiceError::Repository`] wrapping
    /// [`CapabilityRepositoryError::DuplicateCapabilityName`] when the name
    /// is taken.
    pub async fn create(
        &self,
        request: CreateCapabilityRequest,
    ) -> CapabilityCatalogServiceResult<CapabilityDetails> {
        let draft = request.validate()?;
        let capability = Capability::new(draft, &*self.clock);
        self.catalog.create(&capability).await?;
        info!(
            capability_id = %capability.id(),
            name = %capability.name(),
            priority = %capability.priority(),
            "capability created"
        );
        self.with_agents(capability).await
    }

    /// Fetches a capability with its referencing agents.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityCatalogServiceError::NotFound`] when the
    /// capability does not exist.
    pub async fn get(&self, id: CapabilityId) -> CapabilityCatalogServiceResult<CapabilityDetails> {
        let capability = self.find(id).await?;
        self.with_agents(capability).await
    }

    /// Lists capabilities matching `query`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a repository or directory error when a store fails.
    pub async fn list(
        &self,
        query: &CapabilityQuery,
    ) -> CapabilityCatalogServiceResult<Vec<CapabilityDetails>> {
        let capabilities = self.catalog.list(query).await?;
        if capabilities.is_empty() {
            return Ok(Vec::new());
        }
        let agents = self.agents.snapshot(SnapshotScope::All).await?;
        Ok(capabilities
            .into_iter()
            .map(|capability| CapabilityDetails::resolve(capability, &agents))
            .collect())
    }

    /// Applies a partial update in one repository write.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityCatalogServiceError::NotFound`] when the
    /// capability does not exist or a repository error when a rename
    /// collides.
    pub async fn update(
        &self,
        id: CapabilityId,
        request: UpdateCapabilityRequest,
    ) -> CapabilityCatalogServiceResult<CapabilityDetails> {
        let update = request.validate()?;
        let capability = self.catalog.update(id, &update, self.clock.utc()).await?;
        info!(capability_id = %id, name = %capability.name(), "capability updated");
        self.with_agents(capability).await
    }

    /// Removes a capability from the catalog.
    ///
    /// Agents advertising the name keep it.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityCatalogServiceError::NotFound`] when the
    /// capability does not exist.
    pub async fn delete(&self, id: CapabilityId) -> CapabilityCatalogServiceResult<()> {
        self.catalog.delete(id).await?;
        info!(capability_id = %id, "capability deleted");
        Ok(())
    }

    async fn find(&self, id: CapabilityId) -> CapabilityCatalogServiceResult<Capability> {
        self.catalog
            .find_by_id(id)
            .await?
            .ok_or(CapabilityCatalogServiceError::NotFound(id))
    }

    async fn with_agents(
        &self,
        capability: Capability,
    ) -> CapabilityCatalogServiceResult<CapabilityDetails> {
        let agents = self.agents.snapshot(SnapshotScope::All).await?;
        Ok(CapabilityDetails::resolve(capability, &agents))
    }
}
