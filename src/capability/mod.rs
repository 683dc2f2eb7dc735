//! Capability catalog for Wayfinder.
//!
//! Owns capability definitions (name, category, priority weight) used when
//! ranking agents. Agents refer to capabilities by name only; the catalog
//! reports which agents currently reference a capability by asking the
//! agent directory rather than storing the relation twice. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
