//! Wire representations of request and response bodies.

use crate::agent::domain::{Agent, AgentName, AgentStatus};
use crate::capability::{domain::CapabilityName, services::CapabilityDetails};
use crate::common::{Endpoint, Metadata};
use crate::matching::domain::AgentMatch;
use crate::service_registry::{
    domain::{HealthStatus, ServiceRecord},
    services::ServiceStatusReport,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Body of `POST /services`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterServiceBody {
    /// Logical service name.
    pub name: String,
    /// Connection URL.
    pub url: String,
    /// Optional health probe URL.
    pub health_check_url: Option<String>,
    /// Caller-defined metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Optional TTL override in seconds.
    pub ttl_seconds: Option<u64>,
}

/// Body of `PUT /services/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServiceBody {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement URL.
    pub url: Option<String>,
    /// Replacement health check URL; `null` removes it.
    #[serde(default, deserialize_with = "nullable")]
    pub health_check_url: Option<Option<String>>,
    /// Replacement metadata.
    pub metadata: Option<Metadata>,
}

/// Reads a field where an explicit `null` differs from an absent key.
///
/// Absent keys fall back to `None` through `#[serde(default)]`; `null`
/// yields `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Service record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceView {
    /// Identifier.
    pub service_id: Uuid,
    /// Logical name.
    pub name: String,
    /// Connection URL.
    pub url: Endpoint,
    /// Health probe URL.
    pub health_check_url: Option<Endpoint>,
    /// Metadata.
    pub metadata: Metadata,
    /// Liveness window in seconds.
    pub ttl_seconds: u32,
    /// Registration time.
    pub registered_at: DateTime<Utc>,
    /// Latest heartbeat.
    pub last_heartbeat_at: DateTime<Utc>,
    /// Latest update.
    pub updated_at: DateTime<Utc>,
    /// Time the record stops being visible without another heartbeat.
    pub expires_at: DateTime<Utc>,
    /// Latest probe result, if any.
    pub health: Option<HealthStatus>,
}

impl From<&ServiceRecord> for ServiceView {
    fn from(record: &ServiceRecord) -> Self {
        Self {
            service_id: record.id().into_inner(),
            name: record.name().as_str().to_owned(),
            url: record.url().clone(),
            health_check_url: record.health_check_url().cloned(),
            metadata: record.metadata().clone(),
            ttl_seconds: record.ttl().as_secs(),
            registered_at: record.registered_at(),
            last_heartbeat_at: record.last_heartbeat_at(),
            updated_at: record.updated_at(),
            expires_at: record.expires_at(),
            health: record.last_health().map(|snapshot| snapshot.status()),
        }
    }
}

/// Health probe result as returned by `/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    /// Probed service.
    pub service_id: Uuid,
    /// Service name.
    pub name: String,
    /// Probe outcome.
    pub status: HealthStatus,
    /// Probe time.
    pub checked_at: DateTime<Utc>,
    /// Human-readable detail.
    pub message: Option<String>,
}

impl From<ServiceStatusReport> for StatusView {
    fn from(report: ServiceStatusReport) -> Self {
        Self {
            service_id: report.service_id.into_inner(),
            name: report.name.as_str().to_owned(),
            status: report.snapshot.status(),
            checked_at: report.snapshot.checked_at(),
            message: report.snapshot.message().map(str::to_owned),
        }
    }
}

/// Body of `POST /agents`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAgentBody {
    /// Unique agent name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Version label.
    pub version: String,
    /// Agent endpoint.
    pub url: String,
    /// Optional health probe URL.
    pub health_check_url: Option<String>,
    /// Initial status, `active` when omitted.
    #[serde(default)]
    pub status: AgentStatus,
    /// Metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Capability names.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Body of `PUT /agents/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAgentBody {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description; `null` removes it.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    /// Replacement version.
    pub version: Option<String>,
    /// Replacement endpoint.
    pub url: Option<String>,
    /// Replacement health check URL; `null` removes it.
    #[serde(default, deserialize_with = "nullable")]
    pub health_check_url: Option<Option<String>>,
    /// Replacement status.
    pub status: Option<AgentStatus>,
    /// Replacement metadata.
    pub metadata: Option<Metadata>,
    /// Replacement capability names.
    pub capabilities: Option<Vec<String>>,
}

/// Query string of `GET /agents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentListParams {
    /// Status filter.
    pub status: Option<String>,
    /// Capability filter.
    pub capability: Option<String>,
    /// Entries to skip.
    pub skip: Option<usize>,
    /// Maximum entries to return.
    pub limit: Option<usize>,
}

/// Agent as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    /// Identifier.
    pub agent_id: Uuid,
    /// Name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Version label.
    pub version: String,
    /// Endpoint.
    pub url: Endpoint,
    /// Health probe URL.
    pub health_check_url: Option<Endpoint>,
    /// Status.
    pub status: AgentStatus,
    /// Metadata.
    pub metadata: Metadata,
    /// Capability names, sorted.
    pub capabilities: Vec<CapabilityName>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Latest update.
    pub updated_at: DateTime<Utc>,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            agent_id: agent.id().into_inner(),
            name: agent.name().as_str().to_owned(),
            description: agent.description().map(str::to_owned),
            version: agent.version().as_str().to_owned(),
            url: agent.url().clone(),
            health_check_url: agent.health_check_url().cloned(),
            status: agent.status(),
            metadata: agent.metadata().clone(),
            capabilities: agent.capabilities().iter().cloned().collect(),
            created_at: agent.created_at(),
            updated_at: agent.updated_at(),
        }
    }
}

/// Body of `POST /agents/find`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindAgentsBody {
    /// Capabilities every result must hold.
    #[serde(default)]
    pub required_capabilities: Vec<String>,
    /// Capabilities that raise the score.
    #[serde(default)]
    pub preferred_capabilities: Vec<String>,
    /// Exact-match metadata filters.
    #[serde(default)]
    pub metadata_filters: Map<String, Value>,
    /// Widen the snapshot to every agent.
    #[serde(default)]
    pub include_inactive: bool,
}

/// One ranked entry of `POST /agents/find`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    /// Matched agent.
    pub agent: AgentView,
    /// Preferred capabilities held.
    pub score: usize,
    /// Summed priority of those capabilities.
    pub priority_sum: u32,
}

impl From<&AgentMatch> for MatchView {
    fn from(found: &AgentMatch) -> Self {
        Self {
            agent: AgentView::from(&found.agent),
            score: found.score,
            priority_sum: found.priority_sum,
        }
    }
}

/// Body of `POST /capabilities`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCapabilityBody {
    /// Unique name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Priority, 5 when omitted.
    pub priority: Option<i64>,
    /// Metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

/// Body of `PUT /capabilities/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCapabilityBody {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description; `null` removes it.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    /// Replacement category; `null` removes it.
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    /// Replacement priority.
    pub priority: Option<i64>,
    /// Replacement metadata.
    pub metadata: Option<Metadata>,
}

/// Query string of `GET /capabilities`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapabilityListParams {
    /// Category filter.
    pub category: Option<String>,
    /// Entries to skip.
    pub skip: Option<usize>,
    /// Maximum entries to return.
    pub limit: Option<usize>,
}

/// Capability as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityView {
    /// Identifier.
    pub capability_id: Uuid,
    /// Name.
    pub name: CapabilityName,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Priority weight.
    pub priority: u8,
    /// Metadata.
    pub metadata: Metadata,
    /// Names of agents advertising the capability.
    pub agents: Vec<AgentName>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Latest update.
    pub updated_at: DateTime<Utc>,
}

impl From<CapabilityDetails> for CapabilityView {
    fn from(details: CapabilityDetails) -> Self {
        let CapabilityDetails { capability, agents } = details;
        Self {
            capability_id: capability.id().into_inner(),
            name: capability.name().clone(),
            description: capability.description().map(str::to_owned),
            category: capability.category().map(str::to_owned),
            priority: capability.priority().value(),
            metadata: capability.metadata().clone(),
            agents,
            created_at: capability.created_at(),
            updated_at: capability.updated_at(),
        }
    }
}

/// Body of `GET /` and `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthView {
    /// Component name.
    pub service: String,
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Response time.
    pub timestamp: DateTime<Utc>,
    /// Number of live service records.
    pub live_services: usize,
}
