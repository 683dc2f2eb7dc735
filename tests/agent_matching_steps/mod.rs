//! Step definitions for agent matching scenarios.

pub mod world;

mod given;
mod then;
