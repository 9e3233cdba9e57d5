//! Graphviz DOT output.

use super::{NodeIds, RenderError, Renderer};
use crate::explorer::StateGraph;
use std::fmt::Write;

/// Renders a left-to-right `digraph` with boxed, quoted nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotRenderer;

impl Renderer for DotRenderer {
    fn render(&self, graph: &StateGraph) -> Result<String, RenderError> {
        let ids = NodeIds::new(graph.nodes(), &[]);
        let mut out = String::from("digraph G {\n  rankdir=LR;\n  node [shape=box];\n\n");

        for node in graph.nodes() {
            let label = node
                .labels()
                .iter()
                .map(|line| escape(line))
                .collect::<Vec<_>>()
                .join("\\n");
            let _ = writeln!(out, "  \"{}\" [label=\"{}\"];", ids.get(node.id())?, label);
        }

        out.push('\n');

        for edge in graph.edges() {
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\" [label=\"{}\"];",
                ids.get(&edge.from)?,
                ids.get(&edge.to)?,
                escape(&edge.rule)
            );
        }

        out.push_str("}\n");
        Ok(out)
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
