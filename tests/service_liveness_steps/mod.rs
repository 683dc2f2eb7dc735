//! Step definitions for service liveness scenarios.

pub mod world;
