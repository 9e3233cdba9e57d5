//! Key/value rule documents with create/update/delete effects.
//!
//! In TOML:
//!
//! ```toml
//! [start_resources]
//! user_count = 0
//! server_status = "stopped"
//!
//! [[edge_rules]]
//! name = "start_server"
//! fire_condition = 'server_status == "stopped"'
//! block_condition = "user_count > 100"
//!
//! [[edge_rules.effect]]
//! action = "update"
//! resource = { key = "server_status", value = "running" }
//! ```
//!
//! The same structure is accepted as YAML or JSON. Conditions use the
//! [expression language](crate::expr). An empty fire condition fires only on
//! the empty state; an empty block condition never blocks. Effect steps apply
//! in order, and values are stored as written.

use super::{check, finish, rule_location, rule_name, ParseError, RuleSet, RuleSource, SchemaProblem};
use crate::core::{Condition, Effect, EvalError, Representation, Rule, State, StateContent};
use crate::expr::Expression;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Document syntax read by a [`CudSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CudSyntax {
    Json,
    Toml,
    Yaml,
}

impl CudSyntax {
    /// Syntax implied by a file extension: TOML or YAML when the extension
    /// says so, JSON otherwise.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Self::Toml,
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl fmt::Display for CudSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Toml => f.write_str("toml"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

/// Reads key/value rule documents.
#[derive(Debug, Clone, Copy)]
pub struct CudSource {
    syntax: CudSyntax,
}

impl CudSource {
    pub fn new(syntax: CudSyntax) -> Self {
        Self { syntax }
    }

    pub fn json() -> Self {
        Self::new(CudSyntax::Json)
    }

    pub fn toml() -> Self {
        Self::new(CudSyntax::Toml)
    }

    pub fn yaml() -> Self {
        Self::new(CudSyntax::Yaml)
    }

    pub fn syntax(&self) -> CudSyntax {
        self.syntax
    }

    fn document(&self, raw: &str) -> Result<CudDocument, ParseError> {
        let parsed = match self.syntax {
            CudSyntax::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
            CudSyntax::Toml => toml::from_str(raw).map_err(|e| e.to_string()),
            CudSyntax::Yaml => serde_yaml::from_str(raw).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ParseError::Syntax {
            format: self.name(),
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CudDocument {
    #[serde(default)]
    start_resources: BTreeMap<String, Value>,
    #[serde(default)]
    edge_rules: Vec<CudRuleSpec>,
}

#[derive(Debug, Deserialize)]
struct CudRuleSpec {
    #[serde(default)]
    name: String,
    #[serde(default)]
    effect: Vec<StepSpec>,
    #[serde(default)]
    fire_condition: String,
    #[serde(default)]
    block_condition: String,
}

#[derive(Debug, Deserialize)]
struct StepSpec {
    #[serde(default)]
    action: String,
    #[serde(default)]
    resource: ResourceSpec,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceSpec {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Create { key: String, value: Value },
    Update { key: String, value: Value },
    Delete { key: String },
}

impl Step {
    fn from_spec(location: &str, spec: &StepSpec) -> Result<Self, SchemaProblem> {
        let key = spec.resource.key.clone();
        if key.is_empty() {
            return Err(SchemaProblem::new(
                format!("{location}.resource.key"),
                "resource key must not be empty",
            ));
        }
        let value = || {
            spec.resource.value.clone().ok_or_else(|| {
                SchemaProblem::new(
                    format!("{location}.resource.value"),
                    format!("action '{}' needs a value", spec.action),
                )
            })
        };

        match spec.action.as_str() {
            "create" => Ok(Self::Create { key, value: value()? }),
            "update" => Ok(Self::Update { key, value: value()? }),
            "delete" => Ok(Self::Delete { key }),
            other => Err(SchemaProblem::new(
                format!("{location}.action"),
                format!("unknown action '{other}'; expected create, update or delete"),
            )),
        }
    }

    fn apply(&self, resources: &mut BTreeMap<String, Value>) -> Result<(), EvalError> {
        match self {
            Self::Create { key, value } => {
                resources.insert(key.clone(), value.clone());
            }
            Self::Update { key, value } => {
                let slot = resources
                    .get_mut(key)
                    .ok_or_else(|| EvalError::MissingResource { key: key.clone() })?;
                *slot = value.clone();
            }
            Self::Delete { key } => {
                resources.remove(key);
            }
        }
        Ok(())
    }
}

fn steps(index: usize, spec: &CudRuleSpec) -> Result<Vec<Step>, SchemaProblem> {
    let location = rule_location(index, &spec.name);
    if spec.effect.is_empty() {
        return Err(SchemaProblem::new(
            format!("{location}.effect"),
            "effect must have at least one step",
        ));
    }
    spec.effect
        .iter()
        .enumerate()
        .map(|(step, step_spec)| Step::from_spec(&format!("{location}.effect[{step}]"), step_spec))
        .collect()
}

/// Compile a condition; blank text means "no expression".
fn compile(
    index: usize,
    spec: &CudRuleSpec,
    field: &str,
    text: &str,
) -> Result<Option<Expression>, SchemaProblem> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Expression::parse(text).map(Some).map_err(|e| {
        SchemaProblem::new(
            format!("{}.{field}", rule_location(index, &spec.name)),
            format!("invalid expression: {e}"),
        )
    })
}

fn expression_condition(expression: Expression) -> Condition {
    Condition::try_new(move |state: &State| expression.eval_bool(state.require_resources()?))
}

fn fire_condition(expression: Option<Expression>) -> Condition {
    expression.map_or_else(Condition::when_empty, expression_condition)
}

fn block_condition(expression: Option<Expression>) -> Condition {
    expression.map_or_else(|| Condition::constant(false), expression_condition)
}

fn effect(steps: Vec<Step>) -> Effect {
    Effect::try_new(move |state: &State| {
        let mut resources = state.require_resources()?.clone();
        for step in &steps {
            step.apply(&mut resources)?;
        }
        Ok(StateContent::Resources(resources))
    })
}

impl RuleSource for CudSource {
    fn name(&self) -> &'static str {
        match self.syntax {
            CudSyntax::Json => "cud/json",
            CudSyntax::Toml => "cud/toml",
            CudSyntax::Yaml => "cud/yaml",
        }
    }

    fn parse(&self, raw: &str) -> Result<RuleSet, ParseError> {
        let document = self.document(raw)?;

        let mut checks = Vec::new();
        let mut compiled = Vec::with_capacity(document.edge_rules.len());
        for (index, spec) in document.edge_rules.iter().enumerate() {
            let name = rule_name(index, &spec.name);
            let effect_steps = steps(index, spec);
            let fire = compile(index, spec, "fire_condition", &spec.fire_condition);
            let block = compile(index, spec, "block_condition", &spec.block_condition);

            checks.push(check(&name));
            checks.push(check(&effect_steps));
            checks.push(check(&fire));
            checks.push(check(&block));
            compiled.push((name, effect_steps, fire, block));
        }
        finish(checks)?;

        let mut rules = Vec::with_capacity(compiled.len());
        for (name, effect_steps, fire, block) in compiled {
            let rule = Rule::builder(name?)
                .representation(Representation::Resources)
                .fire(fire_condition(fire?))
                .block(block_condition(block?))
                .effect(effect(effect_steps?))
                .build()?;
            rules.push(rule);
        }

        Ok(RuleSet {
            start: State::new(StateContent::Resources(document.start_resources)),
            rules,
            representation: Representation::Resources,
        })
    }
}
