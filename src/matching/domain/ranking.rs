//! Pure ranking of an agent snapshot against a match request.

use super::MatchRequest;
use crate::agent::domain::Agent;
use crate::capability::domain::{Capability, CapabilityName, Priority};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Catalog priorities keyed by capability name.
///
/// Names absent from the table weigh zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityTable(HashMap<CapabilityName, Priority>);

impl PriorityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the priority for `name`.
    #[must_use]
    pub fn with(mut self, name: CapabilityName, priority: Priority) -> Self {
        self.0.insert(name, priority);
        self
    }

    /// Returns the weight contributed by `name`.
    #[must_use]
    pub fn weight(&self, name: &CapabilityName) -> u32 {
        self.0
            .get(name)
            .map_or(0, |priority| u32::from(priority.value()))
    }
}

impl<'a> FromIterator<&'a Capability> for PriorityTable {
    fn from_iter<I: IntoIterator<Item = &'a Capability>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|capability| (capability.name().clone(), capability.priority()))
                .collect(),
        )
    }
}

/// One ranked agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentMatch {
    /// The eligible agent.
    pub agent: Agent,
    /// Number of preferred capabilities the agent holds.
    pub score: usize,
    /// Summed catalog priority of those capabilities.
    pub priority_sum: u32,
}

impl AgentMatch {
    fn rank_order(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.priority_sum.cmp(&self.priority_sum))
            .then_with(|| self.agent.id().cmp(&other.agent.id()))
    }
}

/// Ranks `agents` for `request`.
///
/// Ineligible agents are dropped. The rest are ordered by score, then
/// priority sum (both descending), then agent identifier ascending. Agents
/// with score zero are kept. An empty result means nothing matched.
#[must_use]
pub fn rank(request: &MatchRequest, agents: &[Agent], priorities: &PriorityTable) -> Vec<AgentMatch> {
    let mut matches: Vec<AgentMatch> = agents
        .iter()
        .filter(|agent| request.admits(agent))
        .map(|agent| {
            let (score, priority_sum) = request
                .preferred_held_by(agent)
                .fold((0_usize, 0_u32), |(count, sum), name| {
                    (count + 1, sum.saturating_add(priorities.weight(name)))
                });
            AgentMatch {
                agent: agent.clone(),
                score,
                priority_sum,
            }
        })
        .collect();
    matches.sort_by(AgentMatch::rank_order);
    matches
}
