//! Diesel row models for capability persistence.

use super::schema::capabilities;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for capabilities.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = capabilities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CapabilityRow {
    /// Capability identifier.
    pub id: uuid::Uuid,
    /// Capability name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category.
    pub category: Option<String>,
    /// Ranking weight.
    pub priority: i16,
    /// Metadata JSON payload.
    pub metadata: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for capabilities.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = capabilities)]
pub struct NewCapabilityRow {
    /// Capability identifier.
    pub id: uuid::Uuid,
    /// Capability name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category.
    pub category: Option<String>,
    /// Ranking weight.
    pub priority: i16,
    /// Metadata JSON payload.
    pub metadata: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update of capability columns; `None` fields are skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = capabilities)]
pub struct CapabilityChangeset {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description; `Some(None)` writes `NULL`.
    pub description: Option<Option<String>>,
    /// Replacement category; `Some(None)` writes `NULL`.
    pub category: Option<Option<String>>,
    /// Replacement ranking weight.
    pub priority: Option<i16>,
    /// Replacement metadata.
    pub metadata: Option<Value>,
    /// Update timestamp.
    pub updated_at: DateTime<Utc>,
}
