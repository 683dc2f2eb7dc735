//! Diesel row models for agent persistence.

use super::schema::agents;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for agents.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = agents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AgentRow {
    /// Agent identifier.
    pub id: uuid::Uuid,
    /// Agent name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Version label.
    pub version: String,
    /// Agent endpoint.
    pub url: String,
    /// Optional health probe endpoint.
    pub health_check_url: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Metadata JSON payload.
    pub metadata: Value,
    /// Capability names.
    pub capabilities: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for agents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agents)]
pub struct NewAgentRow {
    /// Agent identifier.
    pub id: uuid::Uuid,
    /// Agent name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Version label.
    pub version: String,
    /// Agent endpoint.
    pub url: String,
    /// Optional health probe endpoint.
    pub health_check_url: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Metadata JSON payload.
    pub metadata: Value,
    /// Capability names.
    pub capabilities: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update of agent columns; `None` fields are skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = agents)]
pub struct AgentChangeset {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description; `Some(None)` writes `NULL`.
    pub description: Option<Option<String>>,
    /// Replacement version label.
    pub version: Option<String>,
    /// Replacement endpoint.
    pub url: Option<String>,
    /// Replacement health probe endpoint; `Some(None)` writes `NULL`.
    pub health_check_url: Option<Option<String>>,
    /// Replacement status.
    pub status: Option<String>,
    /// Replacement metadata.
    pub metadata: Option<Value>,
    /// Replacement capability names.
    pub capabilities: Option<Vec<String>>,
    /// Update timestamp.
    pub updated_at: DateTime<Utc>,
}
