//! Service layer for service registration, heartbeats, and discovery.
//!
//! Provides [`ServiceRegistryService`], a pure directory over a
//! [`LivenessStore`]. Discovery never picks an instance on the caller's
//! behalf; every live match is returned.

use crate::common::{Endpoint, Metadata};
use crate::service_registry::{
    domain::{
        ServiceDomainError, ServiceDraft, ServiceId, ServiceName, ServiceRecord, ServiceUpdate,
        Ttl,
    },
    ports::{LivenessStore, LivenessStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for registering a service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterServiceRequest {
    name: String,
    url: String,
    health_check_url: Option<String>,
    metadata: Metadata,
    ttl_seconds: Option<u64>,
}

impl RegisterServiceRequest {
    /// Creates a request with the required name and URL.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            health_check_url: None,
            metadata: Metadata::new(),
            ttl_seconds: None,
        }
    }

    /// Sets the health probe URL.
    #[must_use]
    pub fn with_health_check_url(mut self, url: impl Into<String>) -> Self {
        self.health_check_url = Some(url.into());
        self
    }

    /// Sets caller-defined metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Overrides the configured default TTL for this record.
    #[must_use]
    pub const fn with_ttl_seconds(mut self, seconds: u64) -> Self {
        self.ttl_seconds = Some(seconds);
        self
    }

    fn validate(self, default_ttl: Ttl) -> Result<ServiceDraft, ServiceDomainError> {
        Ok(ServiceDraft {
            name: ServiceName::new(self.name)?,
            url: Endpoint::new(self.url)?,
            health_check_url: self.health_check_url.map(Endpoint::new).transpose()?,
            metadata: self.metadata,
            ttl: self
                .ttl_seconds
                .map(Ttl::from_secs)
                .transpose()?
                .unwrap_or(default_ttl),
        })
    }
}

/// Request payload for a partial service update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateServiceRequest {
    name: Option<String>,
    url: Option<String>,
    health_check_url: Option<Option<String>>,
    metadata: Option<Metadata>,
}

impl UpdateServiceRequest {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the connection URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replaces the health probe URL.
    #[must_use]
    pub fn with_health_check_url(mut self, url: impl Into<String>) -> Self {
        self.health_check_url = Some(Some(url.into()));
        self
    }

    /// Removes the health check URL; later health checks report `unknown`.
    #[must_use]
    pub fn clear_health_check_url(mut self) -> Self {
        self.health_check_url = Some(None);
        self
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn validate(self) -> Result<ServiceUpdate, ServiceDomainError> {
        Ok(ServiceUpdate {
            name: self.name.map(ServiceName::new).transpose()?,
            url: self.url.map(Endpoint::new).transpose()?,
            health_check_url: self
                .health_check_url
                .map(|url| url.map(Endpoint::new).transpose())
                .transpose()?,
            metadata: self.metadata,
        })
    }
}

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum ServiceRegistryServiceError {
    /// Input validation failed; nothing was written.
    #[error(transparent)]
    Domain(#[from] ServiceDomainError),
    /// The service is unknown, expired, or was deregistered.
    #[error("service {0} not found")]
    NotFound(ServiceId),
    /// The liveness store failed.
    #[error(transparent)]
    Store(LivenessStoreError),
}

impl From<LivenessStoreError> for ServiceRegistryServiceError {
    fn from(err: LivenessStoreError) -> Self {
        match err {
            LivenessStoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Result type for registry service operations.
pub type ServiceRegistryServiceResult<T> = Result<T, ServiceRegistryServiceError>;

/// Service registration, liveness, and discovery orchestration.
pub struct ServiceRegistryService<S, C>
where
    S: LivenessStore + ?Sized,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    default_ttl: Ttl,
}

impl<S, C> Clone for ServiceRegistryService<S, C>
where
    S: LivenessStore + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            default_ttl: self.default_ttl,
        }
    }
}

impl<S, C> ServiceRegistryService<S, C>
where
    S: LivenessStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a registry service using [`Ttl::DEFAULT`].
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            default_ttl: Ttl::DEFAULT,
        }
    }

    /// Sets the TTL applied when a registration does not override it.
    #[must_use]
    pub const fn with_default_ttl(mut self, ttl: Ttl) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Returns the TTL applied to registrations without an override.
    #[must_use]
    pub const fn default_ttl(&self) -> Ttl {
        self.default_ttl
    }

    /// Registers a new service instance.
    ///
    /// Every call creates a distinct record, even when the name and URL
    /// match an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::Domain`] when input validation
    /// fails or [`ServiceRegistryServiceError::Store`] when persistence
    /// fails.
    pub async fn register(
        &self,
        request: RegisterServiceRequest,
    ) -> ServiceRegistryServiceResult<ServiceRecord> {
        let draft = request.validate(self.default_ttl)?;
        let record = ServiceRecord::new(draft, &*self.clock);
        self.store.insert(&record).await?;
        info!(
            service_id = %record.id(),
            name = %record.name(),
            url = %record.url(),
            ttl = %record.ttl(),
            "service registered"
        );
        Ok(record)
    }

    /// Restarts the liveness window of a live service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::NotFound`] when the service is
    /// unknown or already expired; the caller must register again.
    pub async fn heartbeat(&self, id: ServiceId) -> ServiceRegistryServiceResult<ServiceRecord> {
        let now = self.clock.utc();
        let result = self.store.touch(id, now, now).await;
        if let Err(LivenessStoreError::NotFound(_)) = &result {
            debug!(service_id = %id, "heartbeat for unknown or expired service");
        }
        Ok(result?)
    }

    /// Returns a live service record.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::NotFound`] when the service is
    /// unknown or expired.
    pub async fn get(&self, id: ServiceId) -> ServiceRegistryServiceResult<ServiceRecord> {
        self.store
            .find_live(id, self.clock.utc())
            .await?
            .ok_or(ServiceRegistryServiceError::NotFound(id))
    }

    /// Returns every live service record.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::Store`] when the store cannot
    /// be read; a failure is never reported as an empty list.
    pub async fn list(&self) -> ServiceRegistryServiceResult<Vec<ServiceRecord>> {
        Ok(self.store.scan_live(self.clock.utc()).await?)
    }

    /// Applies a partial update to a live service.
    ///
    /// Refreshes `updated_at` but not the liveness window.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::Domain`] for invalid fields,
    /// [`ServiceRegistryServiceError::NotFound`] when the service is unknown
    /// or expired, or [`ServiceRegistryServiceError::Store`] on persistence
    /// failure.
    pub async fn update(
        &self,
        id: ServiceId,
        request: UpdateServiceRequest,
    ) -> ServiceRegistryServiceResult<ServiceRecord> {
        let update = request.validate()?;
        let now = self.clock.utc();
        let record = self.store.update_live(id, &update, now, now).await?;
        info!(service_id = %id, name = %record.name(), "service updated");
        Ok(record)
    }

    /// Removes a live service immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::NotFound`] when the service is
    /// unknown, expired, or already deregistered.
    pub async fn deregister(&self, id: ServiceId) -> ServiceRegistryServiceResult<()> {
        self.store.remove_live(id, self.clock.utc()).await?;
        info!(service_id = %id, "service deregistered");
        Ok(())
    }

    /// Returns all live instances named `name`.
    ///
    /// A name that could never be registered yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::Store`] when the store cannot
    /// be read.
    pub async fn discover(&self, name: &str) -> ServiceRegistryServiceResult<Vec<ServiceRecord>> {
        let Ok(service_name) = ServiceName::new(name) else {
            return Ok(Vec::new());
        };
        Ok(self
            .store
            .scan_live_by_name(&service_name, self.clock.utc())
            .await?)
    }

    /// Physically removes expired records from the store.
    ///
    /// Visibility does not depend on this running.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryServiceError::Store`] when the purge fails.
    pub async fn purge_expired(&self) -> ServiceRegistryServiceResult<usize> {
        let purged = self.store.purge_expired(self.clock.utc()).await?;
        if purged > 0 {
            info!(purged, "expired services purged");
        }
        Ok(purged)
    }
}
