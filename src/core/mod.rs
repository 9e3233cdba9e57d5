//! Core data model of the state-space generator.
//!
//! This module contains the pure parts of the system:
//! - Canonically identified states via [`State`] and [`StateId`]
//! - Fire/block [`Condition`]s and state [`Effect`]s
//! - Named [`Rule`]s combining both
//! - [`Transition`] records for graph edges
//!
//! Nothing in this module performs I/O or logging.

mod condition;
mod error;
mod rule;
mod state;
mod transition;

pub use condition::{Condition, Effect};
pub use error::{EvalError, RuleError, Stage};
pub use rule::Rule;
pub use state::{Representation, State, StateContent, StateId, EMPTY_ID};
pub use transition::Transition;
