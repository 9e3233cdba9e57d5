//! Diagnostic sinks for exploration runs.
//!
//! The explorer reports what it does to an [`ExplorationObserver`] passed to
//! its constructor instead of writing to a process-wide logger.
//! [`TracingObserver`] forwards events to `tracing`; [`NoopObserver`] drops
//! them.

use super::config::IterationLimit;
use super::graph::ExplorationStats;
use crate::core::{Rule, State, StateId, Transition};
use tracing::{debug, info, trace, warn};

/// Receives structured events from an exploration run.
///
/// Every method has an empty default body.
pub trait ExplorationObserver {
    fn started(&mut self, _start: &State, _rules: usize) {}

    fn expanding(&mut self, _iteration: usize, _state: &State, _frontier: usize) {}

    fn skipped(&mut self, _id: &StateId) {}

    fn rule_checked(&mut self, _state: &State, _rule: &Rule, _fired: bool) {}

    fn node_registered(&mut self, _state: &State, _created: bool) {}

    fn edge_added(&mut self, _edge: &Transition, _enqueued: bool) {}

    fn limit_reached(&mut self, _limit: IterationLimit, _pending: usize) {}

    fn finished(&mut self, _stats: &ExplorationStats, _nodes: usize, _edges: usize) {}
}

impl<T: ExplorationObserver + ?Sized> ExplorationObserver for &mut T {
    fn started(&mut self, start: &State, rules: usize) {
        (**self).started(start, rules);
    }

    fn expanding(&mut self, iteration: usize, state: &State, frontier: usize) {
        (**self).expanding(iteration, state, frontier);
    }

    fn skipped(&mut self, id: &StateId) {
        (**self).skipped(id);
    }

    fn rule_checked(&mut self, state: &State, rule: &Rule, fired: bool) {
        (**self).rule_checked(state, rule, fired);
    }

    fn node_registered(&mut self, state: &State, created: bool) {
        (**self).node_registered(state, created);
    }

    fn edge_added(&mut self, edge: &Transition, enqueued: bool) {
        (**self).edge_added(edge, enqueued);
    }

    fn limit_reached(&mut self, limit: IterationLimit, pending: usize) {
        (**self).limit_reached(limit, pending);
    }

    fn finished(&mut self, stats: &ExplorationStats, nodes: usize, edges: usize) {
        (**self).finished(stats, nodes, edges);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExplorationObserver for NoopObserver {}

/// Emits every event as a structured `tracing` event.
///
/// Per-rule and per-node chatter is logged at `trace`/`debug`, run start and
/// completion at `info`, and truncation at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExplorationObserver for TracingObserver {
    fn started(&mut self, start: &State, rules: usize) {
        info!(start = %start.id(), rules, "exploration_start");
    }

    fn expanding(&mut self, iteration: usize, state: &State, frontier: usize) {
        debug!(iteration, state = %state.id(), frontier, "state_expand");
    }

    fn skipped(&mut self, id: &StateId) {
        trace!(state = %id, "state_already_processed");
    }

    fn rule_checked(&mut self, state: &State, rule: &Rule, fired: bool) {
        trace!(state = %state.id(), rule = rule.name(), fired, "rule_checked");
    }

    fn node_registered(&mut self, state: &State, created: bool) {
        if created {
            debug!(state = %state.id(), "node_created");
        } else {
            trace!(state = %state.id(), "node_reused");
        }
    }

    fn edge_added(&mut self, edge: &Transition, enqueued: bool) {
        debug!(
            from = %edge.from,
            to = %edge.to,
            rule = edge.rule.as_str(),
            enqueued,
            "edge_added"
        );
    }

    fn limit_reached(&mut self, limit: IterationLimit, pending: usize) {
        warn!(%limit, pending, "iteration_limit_reached");
    }

    fn finished(&mut self, stats: &ExplorationStats, nodes: usize, edges: usize) {
        info!(
            expanded = stats.expanded,
            skipped = stats.skipped,
            rule_checks = stats.rule_checks,
            nodes,
            edges,
            "exploration_complete"
        );
    }
}
