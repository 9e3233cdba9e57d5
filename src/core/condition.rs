//! Fire/block conditions and state effects.
//!
//! Conditions are pure predicates over a [`State`]; effects are pure
//! functions from a state to new raw content. Both may fail, and failures are
//! reported as [`EvalError`] rather than defaulting to a boolean.

use super::error::EvalError;
use super::state::{State, StateContent};
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&State) -> Result<bool, EvalError> + Send + Sync>;
type Transform = Arc<dyn Fn(&State) -> Result<StateContent, EvalError> + Send + Sync>;

/// Pure predicate evaluated against a state.
///
/// # Example
///
/// ```rust
/// use blindspot::core::{Condition, State};
///
/// let has_a = Condition::new(|s: &State| s.contains_tag("a"));
///
/// assert!(has_a.check(&State::from_tags(["a"])).unwrap());
/// assert!(!has_a.check(&State::from_tags(["b"])).unwrap());
/// ```
#[derive(Clone)]
pub struct Condition {
    predicate: Predicate,
}

impl Condition {
    /// Create a condition from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&State) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(move |state| Ok(predicate(state))),
        }
    }

    /// Create a condition from a predicate that may fail.
    pub fn try_new<F>(predicate: F) -> Self
    where
        F: Fn(&State) -> Result<bool, EvalError> + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// A condition with a fixed answer.
    pub fn constant(value: bool) -> Self {
        Self::new(move |_| value)
    }

    /// Holds only on the empty state.
    pub fn when_empty() -> Self {
        Self::new(State::is_empty)
    }

    pub fn check(&self, state: &State) -> Result<bool, EvalError> {
        (self.predicate)(state)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").finish_non_exhaustive()
    }
}

/// Pure transformation from a state to new, not yet canonical, content.
#[derive(Clone)]
pub struct Effect {
    transform: Transform,
}

impl Effect {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&State) -> StateContent + Send + Sync + 'static,
    {
        Self {
            transform: Arc::new(move |state| Ok(transform(state))),
        }
    }

    pub fn try_new<F>(transform: F) -> Self
    where
        F: Fn(&State) -> Result<StateContent, EvalError> + Send + Sync + 'static,
    {
        Self {
            transform: Arc::new(transform),
        }
    }

    pub fn apply(&self, state: &State) -> Result<StateContent, EvalError> {
        (self.transform)(state)
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect").finish_non_exhaustive()
    }
}
