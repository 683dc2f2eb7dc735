//! Offset pagination for listing endpoints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a requested page size is out of range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("page limit must be between 1 and {max}, got {actual}")]
pub struct InvalidPageError {
    /// Largest accepted limit.
    pub max: usize,
    /// Rejected limit.
    pub actual: usize,
}

/// Window of a listing: skip `offset` entries, return at most `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    offset: usize,
    limit: usize,
}

impl Page {
    /// Limit used when the caller does not specify one.
    pub const DEFAULT_LIMIT: usize = 100;
    /// Largest accepted limit.
    pub const MAX_LIMIT: usize = 1000;

    /// Creates a validated page.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPageError`] when `limit` is zero or above
    /// [`Page::MAX_LIMIT`].
    pub const fn new(offset: usize, limit: usize) -> Result<Self, InvalidPageError> {
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(InvalidPageError {
                max: Self::MAX_LIMIT,
                actual: limit,
            });
        }
        Ok(Self { offset, limit })
    }

    /// Returns the number of entries to skip.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Returns the maximum number of entries to return.
    #[must_use]
    pub const fn limit(self) -> usize {
        self.limit
    }

    /// Applies the window to an already ordered sequence.
    #[must_use]
    pub fn apply<T>(self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
