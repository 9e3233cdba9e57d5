//! Breadth-first state-space generation.
//!
//! The [`Explorer`] starts from one state, evaluates every rule against every
//! reachable state exactly once, and records the resulting graph.
//!
//! # Key Concepts
//!
//! - **Frontier**: FIFO queue of states waiting to be expanded
//! - **Registry**: canonical id to state; a state reached twice is one node
//! - **Processed set**: ids already expanded; re-queued copies are discarded
//! - **Iteration limit**: caps expansions and marks the result truncated
//!
//! # Example
//!
//! ```rust
//! use blindspot::builder::tag_step;
//! use blindspot::explorer::{Explorer, ExplorerConfig, NoopObserver};
//! use blindspot::tags;
//!
//! let rules = vec![tag_step("add_b", "a", "b"), tag_step("add_c", "b", "c")];
//! let explorer = Explorer::new(tags!["a"], rules, ExplorerConfig::default(), NoopObserver).unwrap();
//! let graph = explorer.generate().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 3);
//! assert_eq!(graph.edges().len(), 2);
//! assert!(graph.is_complete());
//! ```

mod config;
mod error;
mod graph;
mod observer;

pub use config::{ExplorerConfig, IterationLimit, DEFAULT_ITERATION_LIMIT};
pub use error::ExploreError;
pub use graph::{ExplorationStats, StateGraph};
pub use observer::{ExplorationObserver, NoopObserver, TracingObserver};

use crate::core::{Rule, Stage, State, StateId, Transition};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Canonical id to state. A `BTreeMap` so nodes come out sorted by id.
#[derive(Debug, Default)]
struct Registry {
    nodes: BTreeMap<StateId, State>,
}

impl Registry {
    /// Register a state, or reuse the one already holding its id.
    ///
    /// Returns the registered state and whether it was newly created.
    fn register(&mut self, state: State) -> (State, bool) {
        if let Some(existing) = self.nodes.get(state.id()) {
            return (existing.clone(), false);
        }
        self.nodes.insert(state.id().clone(), state.clone());
        (state, true)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn into_sorted(self) -> Vec<State> {
        self.nodes.into_values().collect()
    }
}

/// Breadth-first generator of the reachable state graph.
///
/// One explorer performs one run: [`Explorer::generate`] consumes it, so its
/// frontier, registry and edge list are never shared between runs.
pub struct Explorer<O: ExplorationObserver = TracingObserver> {
    start: State,
    rules: Vec<Rule>,
    config: ExplorerConfig,
    observer: O,
    frontier: VecDeque<State>,
    registry: Registry,
    processed: HashSet<StateId>,
    edges: Vec<Transition>,
}

impl<O: ExplorationObserver> Explorer<O> {
    /// Create an explorer over `rules` starting at `start`.
    ///
    /// Fails if any rule was built for a different representation than the
    /// start state's.
    pub fn new(
        start: State,
        rules: Vec<Rule>,
        config: ExplorerConfig,
        observer: O,
    ) -> Result<Self, ExploreError> {
        if let Some(rule) = rules
            .iter()
            .find(|rule| rule.representation() != start.representation())
        {
            return Err(ExploreError::RepresentationMismatch {
                rule: rule.name().to_string(),
                expected: start.representation(),
                found: rule.representation(),
            });
        }

        Ok(Self {
            start,
            rules,
            config,
            observer,
            frontier: VecDeque::new(),
            registry: Registry::default(),
            processed: HashSet::new(),
            edges: Vec::new(),
        })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Explore every state reachable from the start state.
    ///
    /// Stops when the frontier is empty, or when the iteration limit is hit
    /// with unexpanded states left, in which case the graph is marked
    /// truncated. A rule that fails to evaluate aborts the run.
    pub fn generate(mut self) -> Result<StateGraph, ExploreError> {
        let started_at = Utc::now();
        let limit = self.config.limit;
        let mut expanded = 0;
        let mut skipped = 0;
        let mut rule_checks = 0;
        let mut truncated = false;

        self.observer.started(&self.start, self.rules.len());
        let (start, _) = self.registry.register(self.start.clone());
        self.observer.node_registered(&start, true);
        let start_id = start.id().clone();
        self.frontier.push_back(start);

        while let Some(state) = self.frontier.pop_front() {
            if self.processed.contains(state.id()) {
                skipped += 1;
                self.observer.skipped(state.id());
                continue;
            }
            if !limit.allows(expanded) {
                self.frontier.push_front(state);
                truncated = true;
                self.observer.limit_reached(limit, self.pending());
                break;
            }

            expanded += 1;
            self.processed.insert(state.id().clone());
            self.observer
                .expanding(expanded, &state, self.frontier.len());
            rule_checks += self.expand(&state)?;
        }

        let stats = ExplorationStats {
            expanded,
            skipped,
            rule_checks,
            limit,
            started_at,
            finished_at: Utc::now(),
        };
        self.observer
            .finished(&stats, self.registry.len(), self.edges.len());

        Ok(StateGraph::new(
            start_id,
            self.registry.into_sorted(),
            self.edges,
            truncated,
            stats,
        ))
    }

    /// Evaluate every rule, in order, against one state. Returns the number
    /// of rules checked.
    fn expand(&mut self, state: &State) -> Result<usize, ExploreError> {
        for (index, rule) in self.rules.iter().enumerate() {
            let outcome = rule.evaluate(state)?;
            self.observer.rule_checked(state, rule, outcome.is_some());
            let Some(content) = outcome else {
                continue;
            };

            let target = self
                .start
                .representation()
                .construct(content)
                .map_err(|e| rule.error(state, Stage::Effect, e))?;
            let (target, created) = self.registry.register(target);
            self.observer.node_registered(&target, created);

            let edge = Transition::new(state.id().clone(), target.id().clone(), rule.name(), index);
            let enqueue = !self.processed.contains(target.id());
            self.observer.edge_added(&edge, enqueue);
            self.edges.push(edge);
            if enqueue {
                self.frontier.push_back(target);
            }
        }
        Ok(self.rules.len())
    }

    /// Distinct unexpanded states still waiting in the frontier.
    fn pending(&self) -> usize {
        self.frontier
            .iter()
            .map(State::id)
            .filter(|id| !self.processed.contains(*id))
            .collect::<HashSet<_>>()
            .len()
    }
}
