//! The generated state graph.

use super::config::IterationLimit;
use crate::core::{State, StateId, Transition};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Counters and timing for one exploration run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExplorationStats {
    /// States whose rules were evaluated
    pub expanded: usize,
    /// Frontier entries discarded because their state was already expanded
    pub skipped: usize,
    /// Rule evaluations performed
    pub rule_checks: usize,
    /// Limit the run was configured with
    pub limit: IterationLimit,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExplorationStats {
    /// Wall-clock time of the run, if the clock did not go backwards.
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .ok()
    }
}

/// Nodes and edges discovered from a start state.
///
/// Nodes are sorted by canonical id, so two runs over the same input list
/// them identically. Edges are in discovery order.
#[derive(Clone, Debug, Serialize)]
pub struct StateGraph {
    start: StateId,
    nodes: Vec<State>,
    edges: Vec<Transition>,
    truncated: bool,
    stats: ExplorationStats,
}

impl StateGraph {
    pub(crate) fn new(
        start: StateId,
        nodes: Vec<State>,
        edges: Vec<Transition>,
        truncated: bool,
        stats: ExplorationStats,
    ) -> Self {
        Self {
            start,
            nodes,
            edges,
            truncated,
            stats,
        }
    }

    /// Canonical id of the start state.
    pub fn start(&self) -> &StateId {
        &self.start
    }

    /// All registered states, sorted by canonical id.
    pub fn nodes(&self) -> &[State] {
        &self.nodes
    }

    /// All transitions, in discovery order.
    pub fn edges(&self) -> &[Transition] {
        &self.edges
    }

    /// Check whether the iteration limit stopped exploration early.
    ///
    /// A truncated graph is usable but incomplete: some registered states
    /// were never expanded.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_complete(&self) -> bool {
        !self.truncated
    }

    pub fn stats(&self) -> &ExplorationStats {
        &self.stats
    }

    /// Look up a node by canonical id.
    pub fn node(&self, id: &StateId) -> Option<&State> {
        self.nodes
            .binary_search_by(|node| node.id().cmp(id))
            .ok()
            .map(|index| &self.nodes[index])
    }

    /// Transitions leaving a state, in discovery order.
    pub fn edges_from<'a>(&'a self, id: &'a StateId) -> impl Iterator<Item = &'a Transition> + 'a {
        self.edges.iter().filter(move |edge| &edge.from == id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &StateId> {
        self.nodes.iter().map(State::id)
    }
}
