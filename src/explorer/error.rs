//! Exploration errors.

use crate::core::{Representation, RuleError};
use thiserror::Error;

/// Errors that stop an exploration run.
///
/// Reaching the iteration limit is not an error; it is reported through
/// [`StateGraph::is_truncated`](super::StateGraph::is_truncated).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExploreError {
    /// A rule failed to evaluate against a reachable state.
    #[error("invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    /// A rule was written for a different state representation than the
    /// start state uses.
    #[error("rule '{rule}' operates on {found} states but the start state is a {expected} state")]
    RepresentationMismatch {
        rule: String,
        expected: Representation,
        found: Representation,
    },
}
