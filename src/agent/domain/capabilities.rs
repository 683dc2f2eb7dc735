//! Set of capability names advertised by an agent.

use crate::capability::domain::CapabilityName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capability names held by an agent.
///
/// Duplicates collapse on construction and iteration order is sorted, so two
/// sets with the same members serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<CapabilityName>);

impl CapabilitySet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns whether `name` is a member.
    #[must_use]
    pub fn contains(&self, name: &CapabilityName) -> bool {
        self.0.contains(name)
    }

    /// Returns whether every name in `required` is a member.
    #[must_use]
    pub fn contains_all<'a>(&self, required: impl IntoIterator<Item = &'a CapabilityName>) -> bool {
        required.into_iter().all(|name| self.0.contains(name))
    }

    /// Iterates the names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &CapabilityName> {
        self.0.iter()
    }

    /// Returns the number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CapabilityName> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = CapabilityName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a CapabilityName;
    type IntoIter = std::collections::btree_set::Iter<'a, CapabilityName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
