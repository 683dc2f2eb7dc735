//! Service layer for agent registration, updates and matching snapshots.
//!
//! Capability names an agent advertises are added to the catalog on demand
//! with the default priority, so every advertised name can be looked up
//! there afterwards. Removing a capability from the catalog later leaves
//! agents untouched.

use crate::agent::{
    domain::{
        Agent, AgentDomainError, AgentDraft, AgentId, AgentName, AgentQuery, AgentStatus,
        AgentUpdate, AgentVersion, CapabilitySet, SnapshotScope,
    },
    ports::{AgentRepository, AgentRepositoryError},
};
use crate::capability::{
    domain::{Capability, CapabilityDraft, CapabilityName},
    ports::{CapabilityRepository, CapabilityRepositoryError},
};
use crate::common::{Endpoint, Metadata};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

fn parse_capabilities(names: Vec<String>) -> Result<CapabilitySet, AgentDomainError> {
    names
        .into_iter()
        .map(|name| CapabilityName::new(name).map_err(AgentDomainError::from))
        .collect()
}

/// Request payload for registering an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAgentRequest {
    name: String,
    description: Option<String>,
    version: String,
    url: String,
    health_check_url: Option<String>,
    status: AgentStatus,
    metadata: Metadata,
    capabilities: Vec<String>,
}

impl RegisterAgentRequest {
    /// Creates a request with the required fields and `active` status.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: version.into(),
            url: url.into(),
            health_check_url: None,
            status: AgentStatus::Active,
            metadata: Metadata::new(),
            capabilities: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the health probe URL.
    #[must_use]
    pub fn with_health_check_url(mut self, url: impl Into<String>) -> Self {
        self.health_check_url = Some(url.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the advertised capability names; duplicates collapse.
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = names.into_iter().map(Into::into).collect();
        self
    }

    fn validate(self) -> Result<AgentDraft, AgentDomainError> {
        Ok(AgentDraft {
            name: AgentName::new(self.name)?,
            description: self.description,
            version: AgentVersion::new(self.version)?,
            url: Endpoint::new(self.url)?,
            health_check_url: self.health_check_url.map(Endpoint::new).transpose()?,
            status: self.status,
            metadata: self.metadata,
            capabilities: parse_capabilities(self.capabilities)?,
        })
    }
}

/// Request payload for a partial agent update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAgentRequest {
    name: Option<String>,
    description: Option<Option<String>>,
    version: Option<String>,
    url: Option<String>,
    health_check_url: Option<Option<String>>,
    status: Option<AgentStatus>,
    metadata: Option<Metadata>,
    capabilities: Option<Vec<String>>,
}

impl UpdateAgentRequest {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name.
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

    /// Replaces the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Replaces the endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replaces the health probe URL.
    #[must_use]
    pub fn with_health_check_url(mut self, url: impl Into<String>) -> Self {
        self.health_check_url = Some(Some(url.into()));
        self
    }

    /// Removes the health check URL.
    #[must_use]
    pub fn clear_health_check_url(mut self) -> Self {
        self.health_check_url = Some(None);
        self
    }

    /// Replaces the status.
    #[must_use]
    pub const fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Replaces the whole capability set.
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn validate(self) -> Result<AgentUpdate, AgentDomainError> {
        Ok(AgentUpdate {
            name: self.name.map(AgentName::new).transpose()?,
            description: self.description,
            version: self.version.map(AgentVersion::new).transpose()?,
            url: self.url.map(Endpoint::new).transpose()?,
            health_check_url: self
                .health_check_url
                .map(|url| url.map(Endpoint::new).transpose())
                .transpose()?,
            status: self.status,
            metadata: self.metadata,
            capabilities: self.capabilities.map(parse_capabilities).transpose()?,
        })
    }
}

/// Service-level errors for agent directory operations.
#[derive(Debug, Error)]
pub enum AgentDirectoryServiceError {
    /// Input validation failed; nothing was written.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),
    /// The agent does not exist.
    #[error("agent {0} not found")]
    NotFound(AgentId),
    /// The agent repository failed or rejected the write.
    #[error(transparent)]
    Repository(AgentRepositoryError),
    /// Adding advertised capabilities to the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CapabilityRepositoryError),
}

impl From<AgentRepositoryError> for AgentDirectoryServiceError {
    fn from(err: AgentRepositoryError) -> Self {
        match err {
            AgentRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for agent directory operations.
pub type AgentDirectoryServiceResult<T> = Result<T, AgentDirectoryServiceError>;

/// Agent directory orchestration.
pub struct AgentDirectoryService<A, K, C>
where
    A: AgentRepository + ?Sized,
    K: CapabilityRepository + ?Sized,
    C: Clock + Send + Sync,
{
    agents: Arc<A>,
    catalog: Arc<K>,
    clock: Arc<C>,
}

impl<A, K, C> Clone for AgentDirectoryService<A, K, C>
where
    A: AgentRepository + ?Sized,
    K: CapabilityRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            agents: Arc::clone(&self.agents),
            catalog: Arc::clone(&self.catalog),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<A, K, C> AgentDirectoryService<A, K, C>
where
    A: AgentRepository + ?Sized,
    K: CapabilityRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a directory service.
    #[must_use]
    pub const fn new(agents: Arc<A>, catalog: Arc<K>, clock: Arc<C>) -> Self {
        Self {
            agents,
            catalog,
            clock,
        }
    }

    /// Registers a new agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDirectoryServiceError::Domain`] for invalid input,
    /// [`AgentDirectoryServiceError::Repository`] wrapping
    /// [`AgentRepositoryError::DuplicateAgentName`] when the name is taken,
    /// or a store error.
    pub async fn register(&self, request: RegisterAgentRequest) -> AgentDirectoryServiceResult<Agent> {
        let draft = request.validate()?;
        self.ensure_catalogued(&draft.capabilities).await?;

        let agent = Agent::new(draft, &*self.clock);
        self.agents.create(&agent).await?;
        info!(
            agent_id = %agent.id(),
            name = %agent.name(),
            status = %agent.status(),
            capabilities = agent.capabilities().len(),
            "agent registered"
        );
        Ok(agent)
    }

    /// Fetches an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDirectoryServiceError::NotFound`] when the agent does
    /// not exist.
    pub async fn get(&self, id: AgentId) -> AgentDirectoryServiceResult<Agent> {
        self.agents
            .find_by_id(id)
            .await?
            .ok_or(AgentDirectoryServiceError::NotFound(id))
    }

    /// Lists agents passing `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDirectoryServiceError::Repository`] when the store
    /// fails.
    pub async fn list(&self, query: &AgentQuery) -> AgentDirectoryServiceResult<Vec<Agent>> {
        Ok(self.agents.list(query).await?)
    }

    /// Applies a partial update in one repository write.
    ///
    /// Fields left out of `request` keep their stored values even when
    /// another update lands concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDirectoryServiceError::NotFound`] when the agent does
    /// not exist, [`AgentDirectoryServiceError::Domain`] for invalid input,
    /// or a repository error when a rename collides.
    pub async fn update(
        &self,
        id: AgentId,
        request: UpdateAgentRequest,
    ) -> AgentDirectoryServiceResult<Agent> {
        let update = request.validate()?;
        if let Some(capabilities) = update.capabilities.as_ref() {
            self.get(id).await?;
            self.ensure_catalogued(capabilities).await?;
        }

        let agent = self.agents.update(id, &update, self.clock.utc()).await?;
        info!(agent_id = %id, status = %agent.status(), "agent updated");
        Ok(agent)
    }

    /// Removes an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDirectoryServiceError::NotFound`] when the agent does
    /// not exist.
    pub async fn delete(&self, id: AgentId) -> AgentDirectoryServiceResult<()> {
        self.agents.delete(id).await?;
        info!(agent_id = %id, "agent deleted");
        Ok(())
    }

    /// Takes a point-in-time copy of the agents a matching run considers.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDirectoryServiceError::Repository`] when the store
    /// fails; a failed read is never reported as an empty snapshot.
    pub async fn snapshot(&self, include_inactive: bool) -> AgentDirectoryServiceResult<Vec<Agent>> {
        let scope = SnapshotScope::from_include_inactive(include_inactive);
        Ok(self.agents.snapshot(scope).await?)
    }

    async fn ensure_catalogued(&self, names: &CapabilitySet) -> AgentDirectoryServiceResult<()> {
        if names.is_empty() {
            return Ok(());
        }
        let wanted: Vec<CapabilityName> = names.iter().cloned().collect();
        let known: BTreeSet<CapabilityName> = self
            .catalog
            .find_by_names(&wanted)
            .await?
            .into_iter()
            .map(|capability| capability.name().clone())
            .collect();

        for name in wanted.into_iter().filter(|name| !known.contains(name)) {
            let capability = Capability::new(CapabilityDraft::named(name), &*self.clock);
            match self.catalog.create(&capability).await {
                Ok(()) => info!(capability = %capability.name(), "capability catalogued"),
                Err(CapabilityRepositoryError::DuplicateCapabilityName(existing)) => {
                    debug!(capability = %existing, "capability catalogued concurrently");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
