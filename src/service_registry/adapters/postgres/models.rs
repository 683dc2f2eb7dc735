//! Diesel row models for service liveness persistence.

use super::schema::services;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for service records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServiceRow {
    /// Service identifier.
    pub id: uuid::Uuid,
    /// Logical service name.
    pub name: String,
    /// Connection endpoint.
    pub url: String,
    /// Optional health probe endpoint.
    pub health_check_url: Option<String>,
    /// Metadata JSON payload.
    pub metadata: Value,
    /// Liveness window in seconds.
    pub ttl_seconds: i32,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Latest heartbeat timestamp.
    pub last_heartbeat_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Visibility deadline.
    pub expires_at: DateTime<Utc>,
    /// Latest health snapshot JSON payload.
    pub last_health: Option<Value>,
}

/// Insert model for service records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = services)]
pub struct NewServiceRow {
    /// Service identifier.
    pub id: uuid::Uuid,
    /// Logical service name.
    pub name: String,
    /// Connection endpoint.
    pub url: String,
    /// Optional health probe endpoint.
    pub health_check_url: Option<String>,
    /// Metadata JSON payload.
    pub metadata: Value,
    /// Liveness window in seconds.
    pub ttl_seconds: i32,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Latest heartbeat timestamp.
    pub last_heartbeat_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Visibility deadline.
    pub expires_at: DateTime<Utc>,
}

/// Partial update of descriptive service columns; `None` fields are skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = services)]
pub struct ServiceChangeset {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement endpoint.
    pub url: Option<String>,
    /// Replacement health probe endpoint; `Some(None)` writes `NULL`.
    pub health_check_url: Option<Option<String>>,
    /// Replacement metadata.
    pub metadata: Option<Value>,
    /// Update timestamp.
    pub updated_at: DateTime<Utc>,
}
