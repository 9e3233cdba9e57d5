//! Text renderings of a generated [`StateGraph`].
//!
//! Three notations are provided:
//!
//! - [`MermaidRenderer`]: a Mermaid `graph TD` flow diagram
//! - [`DotRenderer`]: a Graphviz `digraph`
//! - [`JsonRenderer`]: a JSON node/edge document
//!
//! Renderers only read the graph. Nodes are emitted in the graph's sorted
//! order and edges in discovery order, so the same graph always renders to
//! the same text.

mod dot;
mod ids;
mod json;
mod mermaid;

pub use dot::DotRenderer;
pub use ids::NodeIds;
pub use json::JsonRenderer;
pub use mermaid::MermaidRenderer;

use crate::core::StateId;
use crate::explorer::StateGraph;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format '{name}'; expected mermaid, dot or json")]
    UnsupportedFormat { name: String },

    #[error("failed to serialize graph: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("edge refers to state '{id}' which is not a node of the graph")]
    UnknownNode { id: StateId },
}

/// Turns a state graph into text.
pub trait Renderer {
    fn render(&self, graph: &StateGraph) -> Result<String, RenderError>;
}

/// Output notations selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    #[default]
    Mermaid,
    Dot,
    Json,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 3] = [Self::Mermaid, Self::Dot, Self::Json];

    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Self::Mermaid => Box::new(MermaidRenderer),
            Self::Dot => Box::new(DotRenderer),
            Self::Json => Box::new(JsonRenderer),
        }
    }

    /// Render a graph in this notation.
    pub fn render(self, graph: &StateGraph) -> Result<String, RenderError> {
        self.renderer().render(graph)
    }
}

impl FromStr for RenderFormat {
    type Err = RenderError;

    /// Accepts `mermaid`, `dot` (or `graphviz`) and `json` (or `visjs`),
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mermaid" => Ok(Self::Mermaid),
            "dot" | "graphviz" => Ok(Self::Dot),
            "json" | "visjs" => Ok(Self::Json),
            _ => Err(RenderError::UnsupportedFormat {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mermaid => f.write_str("mermaid"),
            Self::Dot => f.write_str("dot"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::builder::tag_step;
    use crate::core::{Condition, Representation, Rule, State, StateContent};
    use crate::explorer::{Explorer, ExplorerConfig, NoopObserver, StateGraph};
    use crate::tags;

    fn step(name: &str, fire: Condition, block: Condition, add: Option<&'static str>, remove: Option<&'static str>) -> Rule {
        Rule::builder(name)
            .representation(Representation::Tags)
            .fire(fire)
            .block(block)
            .transforms(move |s: &State| {
                let mut tags: Vec<String> = s
                    .require_tags()
                    .map(<[String]>::to_vec)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|t| Some(t.as_str()) != remove)
                    .collect();
                tags.extend(add.map(String::from));
                StateContent::Tags(tags)
            })
            .build()
            .unwrap()
    }

    fn has(tag: &'static str) -> Condition {
        Condition::new(move |s: &State| s.contains_tag(tag))
    }

    /// The four-rule a/b system: `empty`, `a` and `a,b` with four edges.
    pub(crate) fn ab_graph() -> StateGraph {
        let rules = vec![
            step("create_a", Condition::when_empty(), Condition::constant(false), Some("a"), None),
            step("create_b_from_a", has("a"), has("b"), Some("b"), None),
            step("delete_b", has("b"), Condition::constant(false), None, Some("b")),
            step("delete_a", has("a"), has("b"), None, Some("a")),
        ];
        Explorer::new(tags![], rules, ExplorerConfig::default(), NoopObserver)
            .unwrap()
            .generate()
            .unwrap()
    }

    /// A single rule adding a tag whose name needs escaping in every notation.
    pub(crate) fn quoted_graph() -> StateGraph {
        let rules = vec![tag_step("say \"hi\"", "start", "a\"b")];
        Explorer::new(tags!["start"], rules, ExplorerConfig::default(), NoopObserver)
            .unwrap()
            .generate()
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_by_name() {
        assert_eq!("mermaid".parse::<RenderFormat>().unwrap(), RenderFormat::Mermaid);
        assert_eq!("DOT".parse::<RenderFormat>().unwrap(), RenderFormat::Dot);
        assert_eq!("visjs".parse::<RenderFormat>().unwrap(), RenderFormat::Json);
    }

    #[test]
    fn unknown_format_is_unsupported() {
        let err = "svg".parse::<RenderFormat>().unwrap_err();

        assert!(matches!(err, RenderError::UnsupportedFormat { ref name } if name == "svg"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for format in RenderFormat::ALL {
            assert_eq!(format.to_string().parse::<RenderFormat>().unwrap(), format);
        }
    }

    #[test]
    fn every_format_renders_the_same_graph() {
        let graph = fixtures::ab_graph();

        for format in RenderFormat::ALL {
            let text = format.render(&graph).unwrap();
            assert!(!text.is_empty(), "{format} produced no output");
        }
    }
}
