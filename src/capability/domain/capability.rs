//! Capability aggregate root.

use super::{CapabilityDomainError, CapabilityId, CapabilityName, Priority};
use crate::common::{Metadata, Page};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated fields for a new capability definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityDraft {
    /// Unique capability name.
    pub name: CapabilityName,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional grouping label.
    pub category: Option<String>,
    /// Ranking weight.
    pub priority: Priority,
    /// Caller-defined metadata.
    pub metadata: Metadata,
}

impl CapabilityDraft {
    /// Creates a draft with default priority and no description.
    #[must_use]
    pub fn named(name: CapabilityName) -> Self {
        Self {
            name,
            description: None,
            category: None,
            priority: Priority::DEFAULT,
            metadata: Metadata::new(),
        }
    }
}

/// Partial update of a capability definition.
///
/// `None` keeps the stored value; `Some(None)` removes an optional one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityUpdate {
    /// Replacement name.
    pub name: Option<CapabilityName>,
    /// Replacement or removal of the description.
    pub description: Option<Option<String>>,
    /// Replacement or removal of the category.
    pub category: Option<Option<String>>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Replacement metadata.
    pub metadata: Option<Metadata>,
}

/// Filter for capability listings, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityQuery {
    /// Only capabilities in this category.
    pub category: Option<String>,
    /// Listing window; `None` returns every match.
    pub page: Option<Page>,
}

/// Normalizes an optional category: trimmed, and rejected when blank.
///
/// # Errors
///
/// Returns [`CapabilityDomainError::EmptyCategory`] for a blank category.
pub(crate) fn normalize_category(
    category: Option<String>,
) -> Result<Option<String>, CapabilityDomainError> {
    category
        .map(|value| {
            let trimmed = value.trim().to_owned();
            if trimmed.is_empty() {
                Err(CapabilityDomainError::EmptyCategory)
            } else {
                Ok(trimmed)
            }
        })
        .transpose()
}

/// Capability definition aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    id: CapabilityId,
    name: CapabilityName,
    description: Option<String>,
    category: Option<String>,
    priority: Priority,
    metadata: Metadata,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCapabilityData {
    /// Persisted identifier.
    pub id: CapabilityId,
    /// Persisted name.
    pub name: CapabilityName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted category.
    pub category: Option<String>,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted metadata.
    pub metadata: Metadata,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Capability {
    /// Creates a new capability definition.
    #[must_use]
    pub fn new(draft: CapabilityDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: CapabilityId::new(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            metadata: draft.metadata,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a capability from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCapabilityData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            category: data.category,
            priority: data.priority,
            metadata: data.metadata,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> CapabilityId {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the priority weight.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update at `at`.
    pub fn apply_update(&mut self, update: CapabilityUpdate, at: DateTime<Utc>) {
        let CapabilityUpdate {
            name,
            description,
            category,
            priority,
            metadata,
        } = update;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = category {
            self.category = value;
        }
        if let Some(value) = priority {
            self.priority = value;
        }
        if let Some(value) = metadata {
            self.metadata = value;
        }
        self.updated_at = at;
    }
}
