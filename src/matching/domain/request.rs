//! Match request: hard requirements, soft preferences and metadata filters.

use super::{MatchError, MetadataValue};
use crate::agent::domain::Agent;
use crate::capability::domain::CapabilityName;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Description of the work an agent is wanted for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRequest {
    required: BTreeSet<CapabilityName>,
    preferred: BTreeSet<CapabilityName>,
    metadata_filters: BTreeMap<String, MetadataValue>,
}

fn parse_names(names: Vec<String>) -> Result<BTreeSet<CapabilityName>, MatchError> {
    names
        .into_iter()
        .map(|name| CapabilityName::new(name).map_err(MatchError::from))
        .collect()
}

impl MatchRequest {
    /// Creates a request from already validated parts.
    #[must_use]
    pub const fn new(
        required: BTreeSet<CapabilityName>,
        preferred: BTreeSet<CapabilityName>,
        metadata_filters: BTreeMap<String, MetadataValue>,
    ) -> Self {
        Self {
            required,
            preferred,
            metadata_filters,
        }
    }

    /// Builds a request from raw wire values.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidCapability`] for an invalid capability
    /// name or [`MatchError::UnsupportedFilterValue`] for a filter value
    /// that is not a string, number or boolean.
    pub fn parse(
        required: Vec<String>,
        preferred: Vec<String>,
        metadata_filters: Map<String, Value>,
    ) -> Result<Self, MatchError> {
        let filters = metadata_filters
            .into_iter()
            .map(|(key, value)| match MetadataValue::from_json(value) {
                Ok(parsed) => Ok((key, parsed)),
                Err(kind) => Err(MatchError::UnsupportedFilterValue { key, kind }),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self::new(
            parse_names(required)?,
            parse_names(preferred)?,
            filters,
        ))
    }

    /// Adds a required capability.
    #[must_use]
    pub fn require(mut self, name: CapabilityName) -> Self {
        self.required.insert(name);
        self
    }

    /// Adds a preferred capability.
    #[must_use]
    pub fn prefer(mut self, name: CapabilityName) -> Self {
        self.preferred.insert(name);
        self
    }

    /// Adds or replaces a metadata filter.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata_filters.insert(key.into(), value);
        self
    }

    /// Removes a metadata filter.
    #[must_use]
    pub fn without_filter(mut self, key: &str) -> Self {
        self.metadata_filters.remove(key);
        self
    }

    /// Returns the required capabilities.
    #[must_use]
    pub const fn required(&self) -> &BTreeSet<CapabilityName> {
        &self.required
    }

    /// Returns the preferred capabilities.
    #[must_use]
    pub const fn preferred(&self) -> &BTreeSet<CapabilityName> {
        &self.preferred
    }

    /// Returns the metadata filters.
    #[must_use]
    pub const fn metadata_filters(&self) -> &BTreeMap<String, MetadataValue> {
        &self.metadata_filters
    }

    /// Returns whether `agent` passes the eligibility filter.
    ///
    /// The agent must be active, hold every required capability and carry
    /// every filtered metadata key with an equal value.
    #[must_use]
    pub fn admits(&self, agent: &Agent) -> bool {
        agent.status().is_usable()
            && agent.capabilities().contains_all(&self.required)
            && self.metadata_filters.iter().all(|(key, expected)| {
                agent
                    .metadata()
                    .get(key)
                    .is_some_and(|actual| expected.matches(actual))
            })
    }

    /// Returns the preferred capabilities `agent` holds.
    pub fn preferred_held_by<'a>(
        &'a self,
        agent: &'a Agent,
    ) -> impl Iterator<Item = &'a CapabilityName> + 'a {
        self.preferred
            .iter()
            .filter(move |name| agent.capabilities().contains(name))
    }
}
