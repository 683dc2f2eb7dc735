//! HTTP error mapping.

use crate::agent::{ports::AgentRepositoryError, services::AgentDirectoryServiceError};
use crate::capability::{
    ports::CapabilityRepositoryError, services::CapabilityCatalogServiceError,
};
use crate::common::InvalidPageError;
use crate::matching::{domain::MatchError, services::AgentMatchingServiceError};
use crate::service_registry::{
    ports::LivenessStoreError, services::ServiceRegistryServiceError,
};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Error returned by every handler.
///
/// Rendered as `{"error": <kind>, "message": <text>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed; nothing was written.
    #[error("{0}")]
    Validation(String),
    /// The addressed resource does not exist or has expired.
    #[error("{0}")]
    NotFound(String),
    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    /// A backing store failed.
    #[error("{0}")]
    StoreUnavailable(String),
}

impl ApiError {
    /// Returns the machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub(crate) fn unknown_id(kind: &str, raw: &str) -> Self {
        Self::NotFound(format!("{kind} {raw} not found"))
    }

    fn store(err: &impl std::error::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "request failed");
        } else {
            debug!(kind = self.kind(), error = %self, "request rejected");
        }
        let body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<InvalidPageError> for ApiError {
    fn from(err: InvalidPageError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ServiceRegistryServiceError> for ApiError {
    fn from(err: ServiceRegistryServiceError) -> Self {
        match err {
            ServiceRegistryServiceError::Domain(inner) => Self::Validation(inner.to_string()),
            ServiceRegistryServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            ServiceRegistryServiceError::Store(LivenessStoreError::DuplicateService(_)) => {
                Self::Conflict(err.to_string())
            }
            ServiceRegistryServiceError::Store(ref inner) => Self::store(inner),
        }
    }
}

impl From<AgentRepositoryError> for ApiError {
    fn from(err: AgentRepositoryError) -> Self {
        match err {
            AgentRepositoryError::DuplicateAgent(_) | AgentRepositoryError::DuplicateAgentName(_) => {
                Self::Conflict(err.to_string())
            }
            AgentRepositoryError::NotFound(_) => Self::NotFound(err.to_string()),
            AgentRepositoryError::InvalidPersistedData(_)
            | AgentRepositoryError::Persistence(_) => Self::store(&err),
        }
    }
}

impl From<CapabilityRepositoryError> for ApiError {
    fn from(err: CapabilityRepositoryError) -> Self {
        match err {
            CapabilityRepositoryError::DuplicateCapability(_)
            | CapabilityRepositoryError::DuplicateCapabilityName(_) => {
                Self::Conflict(err.to_string())
            }
            CapabilityRepositoryError::NotFound(_) => Self::NotFound(err.to_string()),
            CapabilityRepositoryError::InvalidPersistedData(_)
            | CapabilityRepositoryError::Persistence(_) => Self::store(&err),
        }
    }
}

impl From<AgentDirectoryServiceError> for ApiError {
    fn from(err: AgentDirectoryServiceError) -> Self {
        match err {
            AgentDirectoryServiceError::Domain(inner) => Self::Validation(inner.to_string()),
            AgentDirectoryServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            AgentDirectoryServiceError::Repository(inner) => inner.into(),
            AgentDirectoryServiceError::Catalog(inner) => inner.into(),
        }
    }
}

impl From<CapabilityCatalogServiceError> for ApiError {
    fn from(err: CapabilityCatalogServiceError) -> Self {
        match err {
            CapabilityCatalogServiceError::Domain(inner) => Self::Validation(inner.to_string()),
            CapabilityCatalogServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            CapabilityCatalogServiceError::Repository(inner) => inner.into(),
            CapabilityCatalogServiceError::Directory(inner) => inner.into(),
        }
    }
}

impl From<AgentMatchingServiceError> for ApiError {
    fn from(err: AgentMatchingServiceError) -> Self {
        Self::store(&err)
    }
}
