//! Exploration limits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of state expansions allowed when no limit is chosen explicitly.
pub const DEFAULT_ITERATION_LIMIT: usize = 100;

/// Upper bound on the number of states the explorer expands.
///
/// The state space of arbitrary rules is not known to be finite, so there is
/// no implicit "run forever": the default is [`DEFAULT_ITERATION_LIMIT`] and
/// [`IterationLimit::Unbounded`] has to be chosen on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationLimit {
    /// Stop after this many expansions and report truncation.
    Bounded(usize),
    /// Expand until the frontier is empty. May not terminate.
    Unbounded,
}

impl IterationLimit {
    /// Check whether another expansion is allowed after `expanded` ones.
    pub fn allows(&self, expanded: usize) -> bool {
        match self {
            Self::Bounded(max) => expanded < *max,
            Self::Unbounded => true,
        }
    }

    pub fn bound(&self) -> Option<usize> {
        match self {
            Self::Bounded(max) => Some(*max),
            Self::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl Default for IterationLimit {
    fn default() -> Self {
        Self::Bounded(DEFAULT_ITERATION_LIMIT)
    }
}

impl fmt::Display for IterationLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(max) => write!(f, "{max} expansions"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Explorer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub limit: IterationLimit,
}

impl ExplorerConfig {
    pub fn bounded(max: usize) -> Self {
        Self {
            limit: IterationLimit::Bounded(max),
        }
    }

    /// Opt into exploring without an iteration limit.
    pub fn unbounded() -> Self {
        Self {
            limit: IterationLimit::Unbounded,
        }
    }
}
