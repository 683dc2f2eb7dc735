//! Service record aggregate root.

use super::{HealthSnapshot, ServiceId, ServiceName, Ttl};
use crate::common::{Endpoint, Metadata};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated fields supplied when registering a service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    /// Logical service name.
    pub name: ServiceName,
    /// Connection endpoint.
    pub url: Endpoint,
    /// Optional health probe endpoint.
    pub health_check_url: Option<Endpoint>,
    /// Caller-defined metadata.
    pub metadata: Metadata,
    /// Liveness window for this record.
    pub ttl: Ttl,
}

/// Partial update of a service record's mutable fields.
///
/// `None` leaves the stored value untouched. For the health probe URL,
/// `Some(None)` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceUpdate {
    /// Replacement name.
    pub name: Option<ServiceName>,
    /// Replacement connection endpoint.
    pub url: Option<Endpoint>,
    /// Replacement or removal of the health probe endpoint.
    pub health_check_url: Option<Option<Endpoint>>,
    /// Replacement metadata.
    pub metadata: Option<Metadata>,
}

impl ServiceUpdate {
    /// Returns whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.health_check_url.is_none()
            && self.metadata.is_none()
    }
}

/// Registered service instance with its liveness window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    id: ServiceId,
    name: ServiceName,
    url: Endpoint,
    health_check_url: Option<Endpoint>,
    metadata: Metadata,
    ttl: Ttl,
    registered_at: DateTime<Utc>,
    last_heartbeat_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_health: Option<HealthSnapshot>,
}

/// Parameter object for reconstructing a persisted service record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedServiceData {
    /// Persisted service identifier.
    pub id: ServiceId,
    /// Persisted service name.
    pub name: ServiceName,
    /// Persisted connection endpoint.
    pub url: Endpoint,
    /// Persisted health probe endpoint.
    pub health_check_url: Option<Endpoint>,
    /// Persisted metadata.
    pub metadata: Metadata,
    /// Persisted liveness window.
    pub ttl: Ttl,
    /// Persisted registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Persisted heartbeat timestamp.
    pub last_heartbeat_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted health snapshot.
    pub last_health: Option<HealthSnapshot>,
}

impl ServiceRecord {
    /// Creates a fresh registration with a newly generated identifier.
    ///
    /// Registration counts as the first heartbeat.
    #[must_use]
    pub fn new(draft: ServiceDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let ServiceDraft {
            name,
            url,
            health_check_url,
            metadata,
            ttl,
        } = draft;
        Self {
            id: ServiceId::new(),
            name,
            url,
            health_check_url,
            metadata,
            ttl,
            registered_at: timestamp,
            last_heartbeat_at: timestamp,
            updated_at: timestamp,
            last_health: None,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedServiceData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            url: data.url,
            health_check_url: data.health_check_url,
            metadata: data.metadata,
            ttl: data.ttl,
            registered_at: data.registered_at,
            last_heartbeat_at: data.last_heartbeat_at,
            updated_at: data.updated_at,
            last_health: data.last_health,
        }
    }

    /// Returns the service identifier.
    #[must_use]
    pub const fn id(&self) -> ServiceId {
        self.id
    }

    /// Returns the logical service name.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the connection endpoint.
    #[must_use]
    pub const fn url(&self) -> &Endpoint {
        &self.url
    }

    /// Returns the health probe endpoint, if declared.
    #[must_use]
    pub const fn health_check_url(&self) -> Option<&Endpoint> {
        self.health_check_url.as_ref()
    }

    /// Returns the caller-defined metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the liveness window.
    #[must_use]
    pub const fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the latest heartbeat timestamp.
    #[must_use]
    pub const fn last_heartbeat_at(&self) -> DateTime<Utc> {
        self.last_heartbeat_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the latest health probe result.
    #[must_use]
    pub const fn last_health(&self) -> Option<&HealthSnapshot> {
        self.last_health.as_ref()
    }

    /// Returns the first instant at which the record is no longer live.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.last_heartbeat_at + self.ttl.as_delta()
    }

    /// Returns whether the record is visible at `now`.
    ///
    /// Live iff `now - last_heartbeat_at < ttl`.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    /// Records a heartbeat at `at`, restarting the liveness window.
    pub fn heartbeat_at(&mut self, at: DateTime<Utc>) {
        self.last_heartbeat_at = at;
    }

    /// Applies a partial update at `at`.
    ///
    /// Neither the registration timestamp nor the liveness window change.
    pub fn apply_update(&mut self, update: ServiceUpdate, at: DateTime<Utc>) {
        let ServiceUpdate {
            name,
            url,
            health_check_url,
            metadata,
        } = update;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = url {
            self.url = value;
        }
        if let Some(value) = health_check_url {
            self.health_check_url = value;
        }
        if let Some(value) = metadata {
            self.metadata = value;
        }
        self.updated_at = at;
    }

    /// Stores the latest health probe result.
    pub fn record_health(&mut self, snapshot: HealthSnapshot) {
        self.last_health = Some(snapshot);
    }
}
