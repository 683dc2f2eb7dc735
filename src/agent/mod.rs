//! Agent directory for Wayfinder.
//!
//! Tracks agent identity, lifecycle status, metadata and the set of
//! capability names each agent advertises. Capability names are soft
//! references into the catalog: the directory stores them as plain strings
//! and never requires them to exist. The directory also produces the
//! point-in-time snapshots consumed by the matching engine.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
