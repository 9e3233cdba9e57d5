//! Evaluation errors raised by rule conditions and effects.

use super::state::{Representation, StateId};
use std::fmt;
use thiserror::Error;

/// A condition or effect could not be evaluated against a state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("resource '{key}' does not exist in the current state")]
    MissingResource { key: String },

    #[error("expected a {expected} state, found a {found} state")]
    WrongRepresentation {
        expected: Representation,
        found: Representation,
    },

    #[error("type error: {message}")]
    Type { message: String },

    #[error("condition must evaluate to a boolean, got {found}")]
    NotBoolean { found: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("{0}")]
    Failed(String),
}

impl EvalError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type {
            message: message.into(),
        }
    }
}

/// Which part of a rule was being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fire,
    Block,
    Effect,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fire => f.write_str("fire condition"),
            Self::Block => f.write_str("block condition"),
            Self::Effect => f.write_str("effect"),
        }
    }
}

/// A rule failed while being evaluated against a specific state.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("rule '{rule}' failed evaluating its {stage} on state '{state}': {source}")]
pub struct RuleError {
    pub rule: String,
    pub state: StateId,
    pub stage: Stage,
    #[source]
    pub source: EvalError,
}
