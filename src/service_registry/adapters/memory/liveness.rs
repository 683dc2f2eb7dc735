//! In-memory liveness store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::service_registry::{
    domain::{HealthSnapshot, ServiceId, ServiceName, ServiceRecord, ServiceUpdate},
    ports::{LivenessStore, LivenessStoreError, LivenessStoreResult},
};

/// Thread-safe in-memory liveness store.
///
/// Expiry is evaluated at read time against the caller-supplied `now`;
/// expired entries stay in the map until purged.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLivenessStore {
    state: Arc<RwLock<HashMap<ServiceId, ServiceRecord>>>,
}

impl InMemoryLivenessStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessStoreError::Persistence`] when the lock is poisoned.
    pub fn stored_len(&self) -> LivenessStoreResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.len())
    }

    fn with_live_mut<T>(
        &self,
        id: ServiceId,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut ServiceRecord) -> T,
    ) -> LivenessStoreResult<T> {
        let mut state = self.state.write().map_err(lock_error)?;
        let record = state
            .get_mut(&id)
            .filter(|record| record.is_live_at(now))
            .ok_or(LivenessStoreError::NotFound(id))?;
        Ok(f(record))
    }

    fn collect_live(
        &self,
        now: DateTime<Utc>,
        predicate: impl Fn(&ServiceRecord) -> bool,
    ) -> LivenessStoreResult<Vec<ServiceRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut live: Vec<ServiceRecord> = state
            .values()
            .filter(|record| record.is_live_at(now) && predicate(record))
            .cloned()
            .collect();
        live.sort_by_key(|record| (record.registered_at(), record.id()));
        Ok(live)
    }
}

fn lock_error(err: impl std::fmt::Display) -> LivenessStoreError {
    LivenessStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl LivenessStore for InMemoryLivenessStore {
    async fn insert(&self, record: &ServiceRecord) -> LivenessStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&record.id()) {
            return Err(LivenessStoreError::DuplicateService(record.id()));
        }
        state.insert(record.id(), record.clone());
        Ok(())
    }

    async fn find_live(
        &self,
        id: ServiceId,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<Option<ServiceRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .get(&id)
            .filter(|record| record.is_live_at(now))
            .cloned())
    }

    async fn touch(
        &self,
        id: ServiceId,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<ServiceRecord> {
        self.with_live_mut(id, now, |record| {
            record.heartbeat_at(at);
            record.clone()
        })
    }

    async fn update_live(
        &self,
        id: ServiceId,
        update: &ServiceUpdate,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<ServiceRecord> {
        self.with_live_mut(id, now, |record| {
            record.apply_update(update.clone(), at);
            record.clone()
        })
    }

    async fn record_health(
        &self,
        id: ServiceId,
        snapshot: &HealthSnapshot,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<()> {
        self.with_live_mut(id, now, |record| record.record_health(snapshot.clone()))
    }

    async fn remove_live(&self, id: ServiceId, now: DateTime<Utc>) -> LivenessStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        match state.get(&id) {
            Some(record) if record.is_live_at(now) => {
                state.remove(&id);
                Ok(())
            }
            _ => Err(LivenessStoreError::NotFound(id)),
        }
    }

    async fn scan_live(&self, now: DateTime<Utc>) -> LivenessStoreResult<Vec<ServiceRecord>> {
        self.collect_live(now, |_| true)
    }

    async fn scan_live_by_name(
        &self,
        name: &ServiceName,
        now: DateTime<Utc>,
    ) -> LivenessStoreResult<Vec<ServiceRecord>> {
        self.collect_live(now, |record| record.name() == name)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> LivenessStoreResult<usize> {
        let mut state = self.state.write().map_err(lock_error)?;
        let before = state.len();
        state.retain(|_, record| record.is_live_at(now));
        Ok(before - state.len())
    }
}
