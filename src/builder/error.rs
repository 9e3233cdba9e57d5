//! Build errors for the rule builder.

use thiserror::Error;

/// Errors that can occur when building a rule.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Rule name is empty")]
    MissingName,

    #[error("Rule '{rule}' has no representation. Call .representation(..)")]
    MissingRepresentation { rule: String },

    #[error("Rule '{rule}' has no fire condition. Call .fire(..) or .fires_when(..)")]
    MissingFireCondition { rule: String },

    #[error("Rule '{rule}' has no block condition. Call .block(..), .blocks_when(..) or .never_blocks()")]
    MissingBlockCondition { rule: String },

    #[error("Rule '{rule}' has no effect. Call .effect(..) or .transforms(..)")]
    MissingEffect { rule: String },
}
