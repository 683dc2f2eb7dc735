//! Route handlers, one module per resource.

pub mod agents;
pub mod capabilities;
pub mod root;
pub mod services;
pub mod status;

use super::{ApiError, AppState};
use axum::extract::State;
use std::sync::Arc;

/// Extractor for the shared application state.
pub type Shared<C> = State<Arc<AppState<C>>>;

/// Handler result.
pub type ApiResult<T> = Result<T, ApiError>;
