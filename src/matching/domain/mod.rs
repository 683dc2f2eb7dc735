//! Pure matching domain: requests, filter values and ranking.

mod error;
mod filter;
mod ranking;
mod request;

pub use error::MatchError;
pub use filter::MetadataValue;
pub use ranking::{AgentMatch, PriorityTable, rank};
pub use request::MatchRequest;
