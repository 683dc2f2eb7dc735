//! Agent aggregate root.

use super::{AgentId, AgentName, AgentStatus, AgentVersion, CapabilitySet};
use crate::capability::domain::CapabilityName;
use crate::common::{Endpoint, Metadata, Page};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated fields for a new agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDraft {
    /// Unique agent name.
    pub name: AgentName,
    /// Optional description.
    pub description: Option<String>,
    /// Version label.
    pub version: AgentVersion,
    /// Endpoint the agent serves on.
    pub url: Endpoint,
    /// Optional health probe endpoint.
    pub health_check_url: Option<Endpoint>,
    /// Initial status.
    pub status: AgentStatus,
    /// Caller-defined metadata, matched by metadata filters.
    pub metadata: Metadata,
    /// Advertised capability names.
    pub capabilities: CapabilitySet,
}

/// Partial update of an agent; `None` keeps the stored value.
///
/// Optional fields take `Some(None)` to remove the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentUpdate {
    /// Replacement name.
    pub name: Option<AgentName>,
    /// Replacement or removal of the description.
    pub description: Option<Option<String>>,
    /// Replacement version.
    pub version: Option<AgentVersion>,
    /// Replacement endpoint.
    pub url: Option<Endpoint>,
    /// Replacement or removal of the health probe endpoint.
    pub health_check_url: Option<Option<Endpoint>>,
    /// Replacement status.
    pub status: Option<AgentStatus>,
    /// Replacement metadata.
    pub metadata: Option<Metadata>,
    /// Replacement capability set.
    pub capabilities: Option<CapabilitySet>,
}

/// Filter for agent listings, ordered by agent identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentQuery {
    /// Only agents in this status.
    pub status: Option<AgentStatus>,
    /// Only agents advertising this capability.
    pub capability: Option<CapabilityName>,
    /// Listing window.
    pub page: Page,
}

impl AgentQuery {
    /// Returns whether `agent` passes the status and capability filters.
    #[must_use]
    pub fn matches(&self, agent: &Agent) -> bool {
        self.status.is_none_or(|status| agent.status() == status)
            && self
                .capability
                .as_ref()
                .is_none_or(|name| agent.capabilities().contains(name))
    }
}

/// Which agents a matching snapshot covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapshotScope {
    /// Agents whose status is [`AgentStatus::Active`].
    #[default]
    ActiveOnly,
    /// Every agent regardless of status.
    All,
}

impl SnapshotScope {
    /// Returns the scope selected by an `include_inactive` flag.
    #[must_use]
    pub const fn from_include_inactive(include_inactive: bool) -> Self {
        if include_inactive {
            Self::All
        } else {
            Self::ActiveOnly
        }
    }

    /// Returns whether `agent` belongs to the snapshot.
    #[must_use]
    pub const fn includes(self, agent: &Agent) -> bool {
        match self {
            Self::ActiveOnly => agent.status().is_usable(),
            Self::All => true,
        }
    }
}

/// Agent directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    name: AgentName,
    description: Option<String>,
    version: AgentVersion,
    url: Endpoint,
    health_check_url: Option<Endpoint>,
    status: AgentStatus,
    metadata: Metadata,
    capabilities: CapabilitySet,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAgentData {
    /// Persisted identifier.
    pub id: AgentId,
    /// Persisted name.
    pub name: AgentName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted version.
    pub version: AgentVersion,
    /// Persisted endpoint.
    pub url: Endpoint,
    /// Persisted health probe endpoint.
    pub health_check_url: Option<Endpoint>,
    /// Persisted status.
    pub status: AgentStatus,
    /// Persisted metadata.
    pub metadata: Metadata,
    /// Persisted capability names.
    pub capabilities: CapabilitySet,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// Creates a new agent from a validated draft.
    #[must_use]
    pub fn new(draft: AgentDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AgentId::new(),
            name: draft.name,
            description: draft.description,
            version: draft.version,
            url: draft.url,
            health_check_url: draft.health_check_url,
            status: draft.status,
            metadata: draft.metadata,
            capabilities: draft.capabilities,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an agent from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            version: data.version,
            url: data.url,
            health_check_url: data.health_check_url,
            status: data.status,
            metadata: data.metadata,
            capabilities: data.capabilities,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the version label.
    #[must_use]
    pub const fn version(&self) -> &AgentVersion {
        &self.version
    }

    /// Returns the endpoint.
    #[must_use]
    pub const fn url(&self) -> &Endpoint {
        &self.url
    }

    /// Returns the health probe endpoint.
    #[must_use]
    pub const fn health_check_url(&self) -> Option<&Endpoint> {
        self.health_check_url.as_ref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the advertised capability names.
    #[must_use]
    pub const fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update at `at`.
    pub fn apply_update(&mut self, update: AgentUpdate, at: DateTime<Utc>) {
        let AgentUpdate {
            name,
            description,
            version,
            url,
            health_check_url,
            status,
            metadata,
            capabilities,
        } = update;

        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = version {
            self.version = value;
        }
        if let Some(value) = url {
            self.url = value;
        }
        if let Some(value) = health_check_url {
            self.health_check_url = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
        if let Some(value) = metadata {
            self.metadata = value;
        }
        if let Some(value) = capabilities {
            self.capabilities = value;
        }
        self.updated_at = at;
    }
}
