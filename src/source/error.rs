//! Errors raised while reading rule sources.

use crate::builder::BuildError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One problem found while validating a rule source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProblem {
    /// Where the problem is, e.g. `edge_rules[2] (add_user).effect[0].resource.key`.
    pub location: String,
    pub message: String,
}

impl SchemaProblem {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// A rule source could not be turned into a rule set.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed in its syntax.
    #[error("{format} syntax error: {message}")]
    Syntax {
        format: &'static str,
        message: String,
    },

    /// The document is well-formed but describes invalid rules. Every
    /// problem in the document is reported, not only the first.
    #[error("invalid rule source ({} problem(s)): {}", .problems.len(), list(.problems))]
    Invalid { problems: Vec<SchemaProblem> },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("cannot read rule source '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot infer rule source format from '{}'; expected .json, .cud.json, .toml, .yaml or .yml", .path.display())]
    UnknownFormat { path: PathBuf },
}

impl From<SchemaProblem> for ParseError {
    fn from(problem: SchemaProblem) -> Self {
        Self::Invalid {
            problems: vec![problem],
        }
    }
}

fn list(problems: &[SchemaProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
