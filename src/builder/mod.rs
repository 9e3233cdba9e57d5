//! Builder API for ergonomic rule construction.
//!
//! This module provides a fluent builder for rules and macros for states,
//! validating at construction time so that an incomplete rule never reaches
//! the explorer.

pub mod error;
pub mod macros;
pub mod rule;

pub use error::BuildError;
pub use rule::RuleBuilder;

use crate::core::{Condition, Representation, Rule, State, StateContent};

/// Create a tag rule that adds `tag` whenever `trigger` is present and `tag`
/// is not.
///
/// # Example
///
/// ```
/// use blindspot::builder::tag_step;
/// use blindspot::tags;
///
/// let rule = tag_step("add_b", "a", "b");
///
/// assert!(rule.fires(&tags!["a"]).unwrap());
/// assert!(!rule.fires(&tags!["a", "b"]).unwrap());
/// ```
///
/// # Panics
///
/// Panics if `name` is blank.
pub fn tag_step(name: &str, trigger: &str, tag: &str) -> Rule {
    let trigger = trigger.to_string();
    let blocker = tag.to_string();
    let added = tag.to_string();
    RuleBuilder::new(name)
        .representation(Representation::Tags)
        .fire(Condition::new(move |s: &State| s.contains_tag(&trigger)))
        .block(Condition::new(move |s: &State| s.contains_tag(&blocker)))
        .transforms(move |s: &State| {
            let mut tags = s.require_tags().map(<[String]>::to_vec).unwrap_or_default();
            tags.push(added.clone());
            StateContent::Tags(tags)
        })
        .build()
        .expect("tag step always has every part")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags;

    #[test]
    fn tag_step_adds_tag() {
        let rule = tag_step("add_b", "a", "b");
        let content = rule.evaluate(&tags!["a"]).unwrap().unwrap();

        assert_eq!(State::new(content), tags!["a", "b"]);
    }

    #[test]
    fn tag_step_is_blocked_by_its_own_tag() {
        let rule = tag_step("add_b", "a", "b");

        assert_eq!(rule.evaluate(&tags!["a", "b"]).unwrap(), None);
    }
}
