//! Edges of the generated state graph.

use super::state::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record of one firing rule application.
///
/// Transitions are created once, when a rule fires on a state during
/// exploration, and never change afterwards.
///
/// # Example
///
/// ```rust
/// use blindspot::core::{State, Transition};
///
/// let transition = Transition::new(
///     State::from_tags(Vec::<String>::new()).id().clone(),
///     State::from_tags(["a"]).id().clone(),
///     "create_a",
///     0,
/// );
///
/// assert_eq!(transition.to_string(), "empty --create_a--> a");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// Canonical id of the source state
    pub from: StateId,
    /// Canonical id of the resulting state
    pub to: StateId,
    /// Name of the rule that fired
    pub rule: String,
    /// Position of the rule in its rule set; names are not required to be unique
    pub rule_index: usize,
}

impl Transition {
    pub fn new(from: StateId, to: StateId, rule: impl Into<String>, rule_index: usize) -> Self {
        Self {
            from,
            to,
            rule: rule.into(),
            rule_index,
        }
    }

    /// Check whether the rule left the state unchanged.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.rule, self.to)
    }
}
