//! Mermaid flow diagrams.

use super::{NodeIds, RenderError, Renderer};
use crate::explorer::StateGraph;
use std::fmt::Write;

/// Identifiers Mermaid treats as keywords inside `graph` blocks.
const RESERVED: &[&str] = &["end", "graph", "subgraph", "style", "class", "click"];

/// Renders a `graph TD` flowchart: one box per state, labelled with its
/// resources one per line, and one arrow per transition labelled with the
/// rule name.
///
/// ```text
/// graph TD
///     a["a"]
///     empty["empty"]
///
///     empty -->|create_a| a
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MermaidRenderer;

impl Renderer for MermaidRenderer {
    fn render(&self, graph: &StateGraph) -> Result<String, RenderError> {
        let ids = NodeIds::new(graph.nodes(), RESERVED);
        let mut out = String::from("graph TD\n");

        for node in graph.nodes() {
            let label = node
                .labels()
                .iter()
                .map(|line| escape(line))
                .collect::<Vec<_>>()
                .join("<br/>");
            let _ = writeln!(out, "    {}[\"{}\"]", ids.get(node.id())?, label);
        }

        out.push('\n');

        for edge in graph.edges() {
            let _ = writeln!(
                out,
                "    {} -->|{}| {}",
                ids.get(&edge.from)?,
                escape(&edge.rule),
                ids.get(&edge.to)?
            );
        }

        Ok(out)
    }
}

/// Mermaid entity codes for characters that end a label or start an entity.
/// Line breaks become `<br/>` so a label never spans source lines.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '#' => out.push_str("#35;"),
            '"' => out.push_str("#quot;"),
            '|' => out.push_str("#124;"),
            '\n' => out.push_str("<br/>"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::tag_step;
    use crate::explorer::{Explorer, ExplorerConfig, NoopObserver};
    use crate::render::fixtures;
    use crate::tags;

    #[test]
    fn renders_ab_graph() {
        let text = MermaidRenderer.render(&fixtures::ab_graph()).unwrap();

        assert_eq!(
            text,
            "graph TD\n\
             \x20   a[\"a\"]\n\
             \x20   a_b[\"a<br/>b\"]\n\
             \x20   empty[\"empty\"]\n\
             \n\
             \x20   empty -->|create_a| a\n\
             \x20   a -->|create_b_from_a| a_b\n\
             \x20   a -->|delete_a| empty\n\
             \x20   a_b -->|delete_b| a\n"
        );
    }

    #[test]
    fn quotes_are_escaped() {
        let text = MermaidRenderer.render(&fixtures::quoted_graph()).unwrap();

        assert!(text.contains("a_b_start[\"a#quot;b<br/>start\"]"));
        assert!(text.contains("start -->|say #quot;hi#quot;| a_b_start"));
    }

    #[test]
    fn line_breaks_and_entities_stay_inside_labels() {
        let rules = vec![tag_step("first\nsecond #1", "start", "x#quot;\r\ny")];
        let graph = Explorer::new(tags!["start"], rules, ExplorerConfig::default(), NoopObserver)
            .unwrap()
            .generate()
            .unwrap();

        let text = MermaidRenderer.render(&graph).unwrap();

        assert!(text.contains("[\"start<br/>x#35;quot;<br/>y\"]"), "{text}");
        assert!(text.contains("-->|first<br/>second #35;1|"), "{text}");
        for line in text.lines() {
            assert!(line.is_empty() || line == "graph TD" || line.starts_with("    "), "{line:?}");
        }
    }
}
