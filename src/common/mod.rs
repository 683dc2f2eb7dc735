//! Value types shared by the registry bounded contexts.

mod clock;
mod endpoint;
mod page;

pub use clock::ManualClock;
pub use endpoint::{Endpoint, InvalidEndpointError};
pub use page::{InvalidPageError, Page};

/// Caller-defined metadata attached to services, agents, and capabilities.
///
/// Values are arbitrary JSON; only matching restricts filter values to
/// scalars.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
