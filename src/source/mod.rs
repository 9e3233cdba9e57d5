//! Rule sources: turn a document into a start state and a rule list.
//!
//! Two formats are supported:
//!
//! - [`TagListSource`]: JSON documents over tag-list states, where each rule
//!   creates, updates or deletes one tag
//! - [`CudSource`]: YAML, TOML or JSON documents over key/value states, with
//!   expression conditions and multi-step create/update/delete effects
//!
//! Sources validate the whole document before building any rule and report
//! every problem found through [`ParseError::Invalid`], accumulated with
//! `stillwater`'s `Validation`.

mod cud;
mod error;
mod tags;

pub use cud::{CudSource, CudSyntax};
pub use error::{ParseError, SchemaProblem};
pub use tags::TagListSource;

use crate::core::{Representation, Rule, State};
use crate::explorer::{ExplorationObserver, ExploreError, Explorer, ExplorerConfig};
use std::fmt;
use std::fs;
use std::path::Path;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Start state, rules and state constructor produced by a [`RuleSource`].
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub start: State,
    pub rules: Vec<Rule>,
    /// Representation of every state; [`Representation::construct`] builds
    /// the states the rules' effects produce.
    pub representation: Representation,
}

impl RuleSet {
    /// Hand the start state and rules to a new explorer.
    pub fn into_explorer<O: ExplorationObserver>(
        self,
        config: ExplorerConfig,
        observer: O,
    ) -> Result<Explorer<O>, ExploreError> {
        Explorer::new(self.start, self.rules, config, observer)
    }
}

/// A parser from raw document text to a [`RuleSet`].
pub trait RuleSource {
    /// Short name of the format, reported in [`ParseError::Syntax`].
    fn name(&self) -> &'static str;

    fn parse(&self, raw: &str) -> Result<RuleSet, ParseError>;
}

/// Which [`RuleSource`] reads a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Tags,
    Cud(CudSyntax),
}

impl SourceFormat {
    /// Infer the format from a file name: `*.yaml`, `*.yml`, `*.toml` and
    /// `*.cud.json` are key/value documents, any other `*.json` is a tag-list
    /// document.
    pub fn detect(path: &Path) -> Result<Self, ParseError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let key_value = [".cud.json", ".toml", ".yaml", ".yml"];
        if key_value.iter().any(|suffix| file_name.ends_with(suffix)) {
            Ok(Self::Cud(CudSyntax::from_path(path)))
        } else if file_name.ends_with(".json") {
            Ok(Self::Tags)
        } else {
            Err(ParseError::UnknownFormat {
                path: path.to_path_buf(),
            })
        }
    }

    pub fn source(self) -> Box<dyn RuleSource> {
        match self {
            Self::Tags => Box::new(TagListSource),
            Self::Cud(syntax) => Box::new(CudSource::new(syntax)),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tags => f.write_str("tags"),
            Self::Cud(syntax) => write!(f, "cud ({syntax})"),
        }
    }
}

/// Read and parse a rule source file. The format is inferred from the file
/// name when not given.
pub fn load(path: &Path, format: Option<SourceFormat>) -> Result<RuleSet, ParseError> {
    let format = match format {
        Some(format) => format,
        None => SourceFormat::detect(path)?,
    };
    let raw = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.source().parse(&raw)
}

pub(crate) type Check = Validation<(), NonEmptyVec<SchemaProblem>>;

/// Turn one field's outcome into a validation check.
pub(crate) fn check<T>(result: &Result<T, SchemaProblem>) -> Check {
    match result {
        Ok(_) => Validation::success(()),
        Err(problem) => Validation::fail(problem.clone()),
    }
}

/// Combine every check, reporting all failures together.
pub(crate) fn finish(checks: Vec<Check>) -> Result<(), ParseError> {
    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(ParseError::Invalid {
            problems: errors.iter().cloned().collect(),
        }),
    }
}

/// `edge_rules[i] (name)` prefix for problem locations.
pub(crate) fn rule_location(index: usize, name: &str) -> String {
    if name.is_empty() {
        format!("edge_rules[{index}]")
    } else {
        format!("edge_rules[{index}] ({name})")
    }
}

pub(crate) fn rule_name(index: usize, name: &str) -> Result<String, SchemaProblem> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SchemaProblem::new(
            format!("{}.name", rule_location(index, name)),
            "rule name must not be empty",
        ));
    }
    Ok(trimmed.to_string())
}
