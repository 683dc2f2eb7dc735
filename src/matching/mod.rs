//! Matching engine for Wayfinder.
//!
//! Ranks agents for a task description. Ranking itself is a pure function
//! over an agent snapshot and a priority table ([`domain::rank`]); the
//! [`services::AgentMatchingService`] only fetches those inputs before
//! calling it, so no store is touched while scoring.

pub mod domain;
pub mod services;
