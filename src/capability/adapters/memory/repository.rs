//! In-memory repository for capability definitions.

use crate::capability::{
    domain::{Capability, CapabilityId, CapabilityName, CapabilityQuery, CapabilityUpdate},
    ports::{CapabilityRepository, CapabilityRepositoryError, CapabilityRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory capability repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCapabilityRepository {
    state: Arc<RwLock<CatalogState>>,
}

#[derive(Debug, Default)]
struct CatalogState {
    capabilities: HashMap<CapabilityId, Capability>,
    name_index: BTreeMap<CapabilityName, CapabilityId>,
}

impl InMemoryCapabilityRepository {
    /// Creates an empty in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> CapabilityRepositoryError {
    CapabilityRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CapabilityRepository for InMemoryCapabilityRepository {
    async fn create(&self, capability: &Capability) -> CapabilityRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if state.capabilities.contains_key(&capability.id()) {
            return Err(CapabilityRepositoryError::DuplicateCapability(
                capability.id(),
            ));
        }
        if state.name_index.contains_key(capability.name()) {
            return Err(CapabilityRepositoryError::DuplicateCapabilityName(
                capability.name().clone(),
            ));
        }

        state
            .name_index
            .insert(capability.name().clone(), capability.id());
        state
            .capabilities
            .insert(capability.id(), capability.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: CapabilityId,
        update: &CapabilityUpdate,
        at: DateTime<Utc>,
    ) -> CapabilityRepositoryResult<Capability> {
        let mut state = self.state.write().map_err(lock_error)?;

        let mut capability = state
            .capabilities
            .get(&id)
            .cloned()
            .ok_or(CapabilityRepositoryError::NotFound(id))?;
        let previous_name = capability.name().clone();
        capability.apply_update(update.clone(), at);

        if *capability.name() != previous_name {
            if state.name_index.contains_key(capability.name()) {
                return Err(CapabilityRepositoryError::DuplicateCapabilityName(
                    capability.name().clone(),
                ));
            }
            state.name_index.remove(&previous_name);
            state.name_index.insert(capability.name().clone(), id);
        }

        state.capabilities.insert(id, capability.clone());
        Ok(capability)
    }

    async fn find_by_id(&self, id: CapabilityId) -> CapabilityRepositoryResult<Option<Capability>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.capabilities.get(&id).cloned())
    }

    async fn find_by_names(
        &self,
        names: &[CapabilityName],
    ) -> CapabilityRepositoryResult<Vec<Capability>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut found: Vec<Capability> = names
            .iter()
            .filter_map(|name| state.name_index.get(name))
            .filter_map(|id| state.capabilities.get(id))
            .cloned()
            .collect();
        found.sort_by(|left, right| left.name().cmp(right.name()));
        found.dedup_by_key(|capability| capability.id());
        Ok(found)
    }

    async fn list(&self, query: &CapabilityQuery) -> CapabilityRepositoryResult<Vec<Capability>> {
        let state = self.state.read().map_err(lock_error)?;
        let matching: Vec<Capability> = state
            .name_index
            .values()
            .filter_map(|id| state.capabilities.get(id))
            .filter(|capability| match query.category.as_deref() {
                Some(category) => capability.category() == Some(category),
                None => true,
            })
            .cloned()
            .collect();
        Ok(match query.page {
            Some(page) => page.apply(matching),
            None => matching,
        })
    }

    async fn delete(&self, id: CapabilityId) -> CapabilityRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .capabilities
            .remove(&id)
            .ok_or(CapabilityRepositoryError::NotFound(id))?;
        state.name_index.remove(removed.name());
        Ok(())
    }
}
