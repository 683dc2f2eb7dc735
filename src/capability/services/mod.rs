//! Orchestration services for the capability catalog.

mod catalog;

pub use catalog::{
    CapabilityCatalogService, CapabilityCatalogServiceError, CapabilityCatalogServiceResult,
    CapabilityDetails, CreateCapabilityRequest, UpdateCapabilityRequest,
};
