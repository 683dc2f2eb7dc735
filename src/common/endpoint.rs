//! Validated connection endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Error returned when an endpoint string is not a usable HTTP(S) URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("endpoint '{0}' must be an absolute http:// or https:// URL with a host")]
pub struct InvalidEndpointError(pub String);

/// Absolute `http://` or `https://` URL, stored as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Creates a validated endpoint.
    ///
    /// The input is trimmed and must parse as a URL with an `http` or
    /// `https` scheme and a non-empty host. The stored value is the trimmed
    /// input, not the parser's normalized form.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEndpointError`] when the value is not an absolute
    /// HTTP(S) URL.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidEndpointError> {
        let raw = value.into();
        let normalized = raw.trim();

        // The parser silently drops tabs and newlines, so reject them first.
        if normalized.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidEndpointError(raw));
        }

        let Ok(parsed) = Url::parse(normalized) else {
            return Err(InvalidEndpointError(raw));
        };
        let is_valid = matches!(parsed.scheme(), "http" | "https")
            && parsed.host_str().is_some_and(|host| !host.is_empty());

        if !is_valid {
            return Err(InvalidEndpointError(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the endpoint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
