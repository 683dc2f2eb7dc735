//! Wayfinder: service and capability registry for agent systems.
//!
//! Wayfinder answers two questions for the components around it: "where is
//! service X running right now" and "which agents can do this task". It
//! keeps a TTL-based directory of service instances, a catalog of
//! capability definitions, a directory of agents, and a pure matching
//! engine that ranks agents for a task.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: validated values and aggregates with no I/O
//! - **Ports**: async trait contracts for stores and probes
//! - **Adapters**: in-memory and `PostgreSQL` implementations
//! - **Services**: orchestration used by the HTTP layer
//!
//! # Modules
//!
//! - [`service_registry`]: service instances, heartbeats, discovery, health
//! - [`capability`]: capability catalog
//! - [`agent`]: agent directory and matching snapshots
//! - [`matching`]: eligibility filtering and ranking
//! - [`api`]: axum router
//! - [`config`], [`telemetry`], [`maintenance`], [`db`]: daemon plumbing

pub mod agent;
pub mod api;
pub mod capability;
pub mod common;
pub mod config;
pub mod db;
pub mod maintenance;
pub mod matching;
pub mod service_registry;
pub mod telemetry;
