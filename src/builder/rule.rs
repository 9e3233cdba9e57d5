//! Builder for constructing rules.

use crate::builder::error::BuildError;
use crate::core::{Condition, Effect, EvalError, Representation, Rule, State, StateContent};

/// Builder for constructing rules with a fluent API.
///
/// Every part of a rule is required; `build` reports the first one missing.
pub struct RuleBuilder {
    name: String,
    representation: Option<Representation>,
    fire: Option<Condition>,
    block: Option<Condition>,
    effect: Option<Effect>,
}

impl RuleBuilder {
    /// Create a new rule builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            representation: None,
            fire: None,
            block: None,
            effect: None,
        }
    }

    /// Set the state representation the rule operates on (required).
    pub fn representation(mut self, representation: Representation) -> Self {
        self.representation = Some(representation);
        self
    }

    /// Set the fire condition (required).
    pub fn fire(mut self, condition: Condition) -> Self {
        self.fire = Some(condition);
        self
    }

    /// Set the fire condition using a closure.
    pub fn fires_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&State) -> bool + Send + Sync + 'static,
    {
        self.fire(Condition::new(predicate))
    }

    /// Set the block condition (required).
    pub fn block(mut self, condition: Condition) -> Self {
        self.block = Some(condition);
        self
    }

    /// Set the block condition using a closure.
    pub fn blocks_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&State) -> bool + Send + Sync + 'static,
    {
        self.block(Condition::new(predicate))
    }

    /// Use a block condition that never holds.
    pub fn never_blocks(self) -> Self {
        self.block(Condition::constant(false))
    }

    /// Set the effect (required).
    pub fn effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Set the effect using an infallible closure.
    pub fn transforms<F>(self, transform: F) -> Self
    where
        F: Fn(&State) -> StateContent + Send + Sync + 'static,
    {
        self.effect(Effect::new(transform))
    }

    /// Set the effect using a closure that may fail.
    pub fn try_transforms<F>(self, transform: F) -> Self
    where
        F: Fn(&State) -> Result<StateContent, EvalError> + Send + Sync + 'static,
    {
        self.effect(Effect::try_new(transform))
    }

    /// Build the rule.
    pub fn build(self) -> Result<Rule, BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::MissingName);
        }
        let rule = self.name;
        let representation = self
            .representation
            .ok_or_else(|| BuildError::MissingRepresentation { rule: rule.clone() })?;
        let fire = self
            .fire
            .ok_or_else(|| BuildError::MissingFireCondition { rule: rule.clone() })?;
        let block = self
            .block
            .ok_or_else(|| BuildError::MissingBlockCondition { rule: rule.clone() })?;
        let effect = self
            .effect
            .ok_or_else(|| BuildError::MissingEffect { rule: rule.clone() })?;

        Ok(Rule {
            name: rule,
            representation,
            fire,
            block,
            effect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(state: &State) -> StateContent {
        state.content().clone()
    }

    #[test]
    fn builder_validates_name() {
        let result = RuleBuilder::new("  ")
            .representation(Representation::Tags)
            .fires_when(|_| true)
            .never_blocks()
            .transforms(identity)
            .build();

        assert!(matches!(result, Err(BuildError::MissingName)));
    }

    #[test]
    fn builder_validates_representation() {
        let result = RuleBuilder::new("r")
            .fires_when(|_| true)
            .never_blocks()
            .transforms(identity)
            .build();

        assert!(matches!(result, Err(BuildError::MissingRepresentation { .. })));
    }

    #[test]
    fn builder_validates_fire_condition() {
        let result = RuleBuilder::new("r")
            .representation(Representation::Tags)
            .never_blocks()
            .transforms(identity)
            .build();

        assert!(matches!(result, Err(BuildError::MissingFireCondition { .. })));
    }

    #[test]
    fn builder_validates_block_condition() {
        let result = RuleBuilder::new("r")
            .representation(Representation::Tags)
            .fires_when(|_| true)
            .transforms(identity)
            .build();

        assert!(matches!(result, Err(BuildError::MissingBlockCondition { .. })));
    }

    #[test]
    fn builder_validates_effect() {
        let result = RuleBuilder::new("r")
            .representation(Representation::Tags)
            .fires_when(|_| true)
            .never_blocks()
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::MissingEffect {
                rule: "r".to_string()
            }
        );
    }

    #[test]
    fn fluent_api_builds_rule() {
        let rule = RuleBuilder::new("keep")
            .representation(Representation::Resources)
            .fire(Condition::when_empty())
            .block(Condition::constant(false))
            .try_transforms(|s| Ok(s.content().clone()))
            .build()
            .unwrap();

        assert_eq!(rule.name(), "keep");
        assert_eq!(rule.representation(), Representation::Resources);
    }
}
