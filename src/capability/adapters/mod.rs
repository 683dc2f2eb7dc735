//! Adapter implementations for capability persistence.

pub mod memory;
pub mod postgres;
