//! Application services for service registration, discovery, and health.

mod health;
mod registry;

pub use health::{ServiceHealthMonitor, ServiceStatusReport};
pub use registry::{
    RegisterServiceRequest, ServiceRegistryService, ServiceRegistryServiceError,
    ServiceRegistryServiceResult, UpdateServiceRequest,
};
