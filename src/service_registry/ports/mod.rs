//! Port contracts for service registration, liveness, and health probing.
//!
//! Ports define infrastructure-agnostic interfaces used by registry
//! services.

pub mod liveness;
pub mod probe;

pub use liveness::{LivenessStore, LivenessStoreError, LivenessStoreResult};
pub use probe::{HealthProbe, ProbeOutcome};
