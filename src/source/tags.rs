//! Tag-list rule documents.
//!
//! ```json
//! {
//!   "start_resources": [],
//!   "edge_rules": [
//!     {"name": "create_a", "action": "create", "rule": ["a"],
//!      "fire_condition": [], "block_condition": []}
//!   ]
//! }
//! ```
//!
//! A rule fires when any tag of `fire_condition` is present, or, when that
//! list is empty, only on the empty state. It is blocked when any tag of
//! `block_condition` is present; an empty list never blocks.

use super::{check, finish, rule_location, rule_name, ParseError, RuleSet, RuleSource, SchemaProblem};
use crate::core::{Condition, Effect, EvalError, Representation, Rule, State, StateContent};
use serde::Deserialize;

/// Reads tag-list rule documents (JSON).
#[derive(Debug, Default, Clone, Copy)]
pub struct TagListSource;

#[derive(Debug, Deserialize)]
struct TagDocument {
    #[serde(default)]
    start_resources: Vec<String>,
    #[serde(default)]
    edge_rules: Vec<TagRuleSpec>,
}

#[derive(Debug, Deserialize)]
struct TagRuleSpec {
    #[serde(default)]
    name: String,
    #[serde(default)]
    action: String,
    #[serde(default)]
    rule: Vec<String>,
    #[serde(default)]
    fire_condition: Vec<String>,
    #[serde(default)]
    block_condition: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TagAction {
    Create(String),
    Update { from: String, to: String },
    Delete(String),
}

impl TagAction {
    fn from_spec(index: usize, spec: &TagRuleSpec) -> Result<Self, SchemaProblem> {
        let location = rule_location(index, &spec.name);
        match spec.action.as_str() {
            "create" => Ok(Self::Create(operands(spec, &location, 1)?[0].clone())),
            "delete" => Ok(Self::Delete(operands(spec, &location, 1)?[0].clone())),
            "update" => {
                let tags = operands(spec, &location, 2)?;
                Ok(Self::Update {
                    from: tags[0].clone(),
                    to: tags[1].clone(),
                })
            }
            other => Err(SchemaProblem::new(
                format!("{location}.action"),
                format!("unknown action '{other}'; expected create, update or delete"),
            )),
        }
    }

    fn into_effect(self) -> Effect {
        Effect::try_new(move |state: &State| {
            let tags = state.require_tags()?;
            let next = match &self {
                Self::Create(tag) => {
                    let mut next = tags.to_vec();
                    next.push(tag.clone());
                    next
                }
                Self::Update { from, to } => {
                    let mut next = tags.to_vec();
                    let slot = next
                        .iter_mut()
                        .find(|tag| tag.as_str() == from.as_str())
                        .ok_or_else(|| EvalError::MissingResource { key: from.clone() })?;
                    *slot = to.clone();
                    next
                }
                Self::Delete(tag) => tags.iter().filter(|t| *t != tag).cloned().collect(),
            };
            Ok(StateContent::Tags(next))
        })
    }
}

/// The `rule` operands of an action, checked for arity.
fn operands<'a>(
    spec: &'a TagRuleSpec,
    location: &str,
    expected: usize,
) -> Result<&'a [String], SchemaProblem> {
    if spec.rule.len() != expected {
        return Err(SchemaProblem::new(
            format!("{location}.rule"),
            format!(
                "action '{}' takes {expected} tag(s), got {}",
                spec.action,
                spec.rule.len()
            ),
        ));
    }
    if spec.rule.iter().any(String::is_empty) {
        return Err(SchemaProblem::new(format!("{location}.rule"), "tags must not be empty"));
    }
    Ok(&spec.rule)
}

/// Fires when any listed tag is present, or only on the empty state when the
/// list is empty.
fn fire_condition(tags: Vec<String>) -> Condition {
    if tags.is_empty() {
        return Condition::when_empty();
    }
    any_present(tags)
}

/// Blocks when any listed tag is present. An empty list never blocks.
fn block_condition(tags: Vec<String>) -> Condition {
    if tags.is_empty() {
        return Condition::constant(false);
    }
    any_present(tags)
}

fn any_present(tags: Vec<String>) -> Condition {
    Condition::try_new(move |state: &State| {
        state.require_tags()?;
        Ok(tags.iter().any(|tag| state.contains_tag(tag)))
    })
}

impl RuleSource for TagListSource {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn parse(&self, raw: &str) -> Result<RuleSet, ParseError> {
        let document: TagDocument = serde_json::from_str(raw).map_err(|e| ParseError::Syntax {
            format: self.name(),
            message: e.to_string(),
        })?;

        let names: Vec<_> = document
            .edge_rules
            .iter()
            .enumerate()
            .map(|(index, spec)| rule_name(index, &spec.name))
            .collect();
        let actions: Vec<_> = document
            .edge_rules
            .iter()
            .enumerate()
            .map(|(index, spec)| TagAction::from_spec(index, spec))
            .collect();

        let checks = names
            .iter()
            .map(check)
            .chain(actions.iter().map(check))
            .collect();
        finish(checks)?;

        let mut rules = Vec::with_capacity(document.edge_rules.len());
        for ((spec, name), action) in document.edge_rules.into_iter().zip(names).zip(actions) {
            let rule = Rule::builder(name?)
                .representation(Representation::Tags)
                .fire(fire_condition(spec.fire_condition))
                .block(block_condition(spec.block_condition))
                .effect(action?.into_effect())
                .build()?;
            rules.push(rule);
        }

        Ok(RuleSet {
            start: State::new(StateContent::Tags(document.start_resources)),
            rules,
            representation: Representation::Tags,
        })
    }
}
