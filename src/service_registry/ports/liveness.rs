//! Liveness store port for service records.
//!
//! A store holds service records whose visibility is bounded by their
//! time-to-live. Every query takes the caller's notion of `now`, and only
//! records with `now < last_heartbeat_at + ttl` are visible to it. Expired
//! records may linger physically until [`LivenessStore::purge_expired`]
//! runs, but no read or conditional write may observe them.

use crate::service_registry::domain::{
    HealthSnapshot, ServiceId, ServiceName, ServiceRecord, ServiceUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for liveness store operations.
pub type LivenessStoreResult<T> = Result<T, LivenessStoreError>;

/// Service record persistence contract with time-to-live visibility.
///
/// Each write is a single atomic operation against the backing store.
#[async_trait]
pub trait LivenessStore: Send + Sync {
    /// Stores a freshly registered record.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessStoreError::DuplicateService`] when the identifier
    /// already exists.
    async fn insert(&self, record: &ServiceRecord) -> LivenessStoreResult<()>;

    /// Finds a record that is live at `now`.
    ///
    /// Returns `None` for unknown and expired identifiers alike.
    async fn find_live(
        &self,
        id: ServiceId,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<Option<ServiceRecord>>;

    /// Restarts the liveness window of a record that is live at `now`.
    ///
    /// The new window starts at `at`. Returns the refreshed record.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessStoreError::NotFound`] when the record is unknown or
    /// has already expired. Expired records are never resurrected.
    async fn touch(
        &self,
        id: ServiceId,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<ServiceRecord>;

    /// Applies a partial update to a record that is live at `now`.
    ///
    /// Only the mutable descriptive fields and `updated_at` change; the
    /// liveness window is left alone. Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessStoreError::NotFound`] when the record is unknown or
    /// has expired.
    async fn update_live(
        &self,
        id: ServiceId,
        update: &ServiceUpdate,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<ServiceRecord>;

    /// Stores the latest health snapshot of a record that is live at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessStoreError::NotFound`] when the record is unknown or
    /// has expired.
    async fn record_health(
        &self,
        id: ServiceId,
        snapshot: &HealthSnapshot,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<()>;

    /// Removes a record that is live at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessStoreError::NotFound`] when the record is unknown or
    /// has expired.
    async fn remove_live(&self, id: ServiceId, now: DateTime<Utc>) -> LivenessStoreResult<()>;

    /// Returns every record live at `now`, ordered by registration time.
    async fn scan_live(&self, now: DateTime<Utc>) -> LivenessStoreResult<Vec<ServiceRecord>>;

    /// Returns records named `name` that are live at `now`, ordered by
    /// registration time.
    async fn scan_live_by_name(
        &self,
        name: &ServiceName,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<Vec<ServiceRecord>>;

    /// Physically deletes records that have expired at `now`.
    ///
    /// Returns the number of records removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> LivenessStoreResult<usize>;
}

/// Errors returned by liveness store implementations.
#[derive(Debug, Clone, Error)]
pub enum LivenessStoreError {
    /// A record with the same identifier already exists.
    #[error("duplicate service identifier: {0}")]
    DuplicateService(ServiceId),

    /// The record is unknown or has expired.
    #[error("service not found: {0}")]
    NotFound(ServiceId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// The backing store is unreachable or failed.
    #[error("liveness store unavailable: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LivenessStoreError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
