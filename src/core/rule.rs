//! Named transition rules.

use super::condition::{Condition, Effect};
use super::error::{EvalError, RuleError, Stage};
use super::state::{Representation, State, StateContent};
use crate::builder::RuleBuilder;

/// A named transition: fire condition, block condition and effect.
///
/// A rule fires on a state when its fire condition holds and its block
/// condition does not. The block condition is only consulted once the fire
/// condition holds. Rules are built through [`RuleBuilder`], which rejects a
/// rule with any missing part.
///
/// # Example
///
/// ```rust
/// use blindspot::core::{Representation, Rule, State, StateContent};
///
/// let rule = Rule::builder("create_b")
///     .representation(Representation::Tags)
///     .fires_when(|s: &State| s.contains_tag("a"))
///     .blocks_when(|s: &State| s.contains_tag("b"))
///     .transforms(|s: &State| {
///         let mut tags = s.require_tags().map(<[String]>::to_vec).unwrap_or_default();
///         tags.push("b".to_string());
///         StateContent::Tags(tags)
///     })
///     .build()
///     .unwrap();
///
/// assert!(rule.fires(&State::from_tags(["a"])).unwrap());
/// assert!(!rule.fires(&State::from_tags(["a", "b"])).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) representation: Representation,
    pub(crate) fire: Condition,
    pub(crate) block: Condition,
    pub(crate) effect: Effect,
}

impl Rule {
    pub fn builder(name: impl Into<String>) -> RuleBuilder {
        RuleBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state representation this rule operates on.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Check whether the rule fires on a state.
    pub fn fires(&self, state: &State) -> Result<bool, RuleError> {
        let fired = self
            .fire
            .check(state)
            .map_err(|e| self.error(state, Stage::Fire, e))?;
        if !fired {
            return Ok(false);
        }
        let blocked = self
            .block
            .check(state)
            .map_err(|e| self.error(state, Stage::Block, e))?;
        Ok(!blocked)
    }

    /// Evaluate the rule against a state.
    ///
    /// Returns the raw content the effect produced when the rule fires, or
    /// `None` when it does not. The content is not canonical yet; pass it to
    /// [`Representation::construct`] to get the target state.
    pub fn evaluate(&self, state: &State) -> Result<Option<StateContent>, RuleError> {
        if !self.fires(state)? {
            return Ok(None);
        }
        let content = self
            .effect
            .apply(state)
            .map_err(|e| self.error(state, Stage::Effect, e))?;
        Ok(Some(content))
    }

    /// Attribute an evaluation failure on `state` to this rule.
    pub(crate) fn error(&self, state: &State, stage: Stage, source: EvalError) -> RuleError {
        RuleError {
            rule: self.name.clone(),
            state: state.id().clone(),
            stage,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn add_tag(tag: &'static str) -> impl Fn(&State) -> StateContent + Send + Sync {
        move |s: &State| {
            let mut tags = s.require_tags().map(<[String]>::to_vec).unwrap_or_default();
            tags.push(tag.to_string());
            StateContent::Tags(tags)
        }
    }

    #[test]
    fn rule_fires_when_fire_holds_and_block_does_not() {
        let rule = Rule::builder("create_b")
            .representation(Representation::Tags)
            .fires_when(|s: &State| s.contains_tag("a"))
            .blocks_when(|s: &State| s.contains_tag("b"))
            .transforms(add_tag("b"))
            .build()
            .unwrap();

        assert!(rule.fires(&State::from_tags(["a"])).unwrap());
        assert!(!rule.fires(&State::from_tags(["a", "b"])).unwrap());
        assert!(!rule.fires(&State::from_tags(["c"])).unwrap());
    }

    #[test]
    fn block_is_not_evaluated_when_fire_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let rule = Rule::builder("never")
            .representation(Representation::Tags)
            .fires_when(|_| false)
            .blocks_when(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            })
            .transforms(add_tag("x"))
            .build()
            .unwrap();

        assert_eq!(rule.evaluate(&State::from_tags(["a"])).unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn evaluate_returns_effect_output() {
        let rule = Rule::builder("create_a")
            .representation(Representation::Tags)
            .fire(Condition::when_empty())
            .never_blocks()
            .transforms(add_tag("a"))
            .build()
            .unwrap();

        let content = rule.evaluate(&State::empty(Representation::Tags)).unwrap();

        assert_eq!(content, Some(StateContent::tags(["a"])));
    }

    #[test]
    fn failing_condition_names_rule_and_state() {
        let rule = Rule::builder("broken")
            .representation(Representation::Tags)
            .fire(Condition::try_new(|_| Err(EvalError::Failed("bad".to_string()))))
            .never_blocks()
            .transforms(add_tag("a"))
            .build()
            .unwrap();

        let err = rule.evaluate(&State::from_tags(["z"])).unwrap_err();

        assert_eq!(err.rule, "broken");
        assert_eq!(err.state.as_str(), "z");
        assert_eq!(err.stage, Stage::Fire);
    }
}
