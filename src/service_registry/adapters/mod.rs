//! Adapter implementations for service registry ports.

pub mod memory;
pub mod postgres;

mod http_probe;

pub use http_probe::HttpHealthProbe;
