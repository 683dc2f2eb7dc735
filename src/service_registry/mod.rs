//! Service liveness registry for Wayfinder.
//!
//! Tracks which backend service instances are alive through expiring
//! heartbeats and answers discovery queries over the live set. A record is
//! visible only while its time-to-live has not elapsed since the last
//! heartbeat (or registration). The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
