//! Repository port for capability definitions.

use crate::capability::domain::{
    Capability, CapabilityId, CapabilityName, CapabilityQuery, CapabilityUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for capability repository operations.
pub type CapabilityRepositoryResult<T> = Result<T, CapabilityRepositoryError>;

/// Capability persistence contract.
#[async_trait]
pub trait CapabilityRepository: Send + Sync {
    /// Stores a new capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityRepositoryError::DuplicateCapability`] when the
    /// identifier exists or
    /// [`CapabilityRepositoryError::DuplicateCapabilityName`] when the name
    /// is taken.
    async fn create(&self, capability: &Capability) -> CapabilityRepositoryResult<()>;

    /// Applies `update` to the stored capability in a single write and
    /// returns the result.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityRepositoryError::NotFound`] when the capability
    /// does not exist or
    /// [`CapabilityRepositoryError::DuplicateCapabilityName`] when a rename
    /// collides.
    async fn update(
        &self,
        id: CapabilityId,
        update: &CapabilityUpdate,
        at: DateTime<Utc>,
    ) -> CapabilityRepositoryResult<Capability>;

    /// Finds a capability by identifier.
    async fn find_by_id(&self, id: CapabilityId) -> CapabilityRepositoryResult<Option<Capability>>;

    /// Returns the catalogued capabilities among `names`.
    ///
    /// Unknown names are skipped.
    async fn find_by_names(
        &self,
        names: &[CapabilityName],
    ) -> CapabilityRepositoryResult<Vec<Capability>>;

    /// Lists capabilities matching `query`, ordered by name.
    async fn list(&self, query: &CapabilityQuery) -> CapabilityRepositoryResult<Vec<Capability>>;

    /// Deletes a capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityRepositoryError::NotFound`] when the capability
    /// does not exist.
    async fn delete(&self, id: CapabilityId) -> CapabilityRepositoryResult<()>;
}

/// Errors returned by capability repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CapabilityRepositoryError {
    /// A capability with the same identifier already exists.
    #[error("duplicate capability identifier: {0}")]
    DuplicateCapability(CapabilityId),

    /// A capability with the same name already exists.
    #[error("duplicate capability name: {0}")]
    DuplicateCapabilityName(CapabilityName),

    /// The capability was not found.
    #[error("capability not found: {0}")]
    NotFound(CapabilityId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CapabilityRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
