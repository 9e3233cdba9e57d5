//! Blindspot: reachable state graphs for rule-driven systems
//!
//! Blindspot takes a start state and a set of named rules and enumerates
//! every state the rules can reach, breadth first. The result is a graph of
//! canonically identified states and the transitions between them, rendered
//! as Mermaid, Graphviz DOT or JSON. Looking at the whole graph shows the
//! states nobody thought about: the blind spots.
//!
//! # Core Concepts
//!
//! - **State**: an immutable snapshot with a canonical, order-independent id
//! - **Rule**: a fire condition, a block condition and an effect
//! - **Explorer**: breadth-first generation with a mandatory iteration limit
//! - **Rule sources**: tag-list and key/value documents that produce rules
//! - **Renderers**: text notations for the generated graph
//!
//! # Example
//!
//! ```rust
//! use blindspot::explorer::{Explorer, ExplorerConfig, NoopObserver};
//! use blindspot::render::{MermaidRenderer, Renderer};
//! use blindspot::source::{RuleSource, TagListSource};
//!
//! let rules = TagListSource
//!     .parse(r#"{
//!         "start_resources": [],
//!         "edge_rules": [
//!             {"name": "create_a", "action": "create", "rule": ["a"]},
//!             {"name": "delete_a", "action": "delete", "rule": ["a"], "fire_condition": ["a"]}
//!         ]
//!     }"#)
//!     .unwrap();
//!
//! let graph = rules
//!     .into_explorer(ExplorerConfig::default(), NoopObserver)
//!     .unwrap()
//!     .generate()
//!     .unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert!(graph.is_complete());
//!
//! let mermaid = MermaidRenderer.render(&graph).unwrap();
//! assert!(mermaid.contains("empty -->|create_a| a"));
//! ```

pub mod builder;
pub mod core;
pub mod explorer;
pub mod expr;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use builder::{BuildError, RuleBuilder};
pub use core::{Rule, State, StateContent, StateId, Transition};
pub use explorer::{Explorer, ExplorerConfig, IterationLimit, StateGraph};
pub use render::{RenderFormat, Renderer};
pub use source::{RuleSet, RuleSource};

#[doc(hidden)]
pub use serde_json as __serde_json;
