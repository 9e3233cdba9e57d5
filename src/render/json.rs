//! JSON node/edge documents, loadable by vis.js network views.

use super::{RenderError, Renderer};
use crate::core::{StateContent, StateId};
use crate::explorer::StateGraph;
use serde::Serialize;

/// Renders pretty-printed JSON:
///
/// ```json
/// {
///   "nodes": [{"id": "a", "label": "a", "resources": ["a"]}],
///   "edges": [{"from": "empty", "to": "a", "rule": "create_a"}],
///   "truncated": false
/// }
/// ```
///
/// Node ids are canonical state ids; labels join the state's resources with
/// newlines.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct Document<'a> {
    nodes: Vec<Node<'a>>,
    edges: Vec<Edge<'a>>,
    truncated: bool,
}

#[derive(Serialize)]
struct Node<'a> {
    id: &'a StateId,
    label: String,
    resources: &'a StateContent,
}

#[derive(Serialize)]
struct Edge<'a> {
    from: &'a StateId,
    to: &'a StateId,
    rule: &'a str,
}

impl Renderer for JsonRenderer {
    fn render(&self, graph: &StateGraph) -> Result<String, RenderError> {
        let document = Document {
            nodes: graph
                .nodes()
                .iter()
                .map(|node| Node {
                    id: node.id(),
                    label: node.label("\n"),
                    resources: node.content(),
                })
                .collect(),
            edges: graph
                .edges()
                .iter()
                .map(|edge| {
                    if graph.node(&edge.from).is_none() {
                        return Err(RenderError::UnknownNode { id: edge.from.clone() });
                    }
                    if graph.node(&edge.to).is_none() {
                        return Err(RenderError::UnknownNode { id: edge.to.clone() });
                    }
                    Ok(Edge {
                        from: &edge.from,
                        to: &edge.to,
                        rule: &edge.rule,
                    })
                })
                .collect::<Result<_, _>>()?,
            truncated: graph.is_truncated(),
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;
    use serde_json::{json, Value};

    #[test]
    fn renders_nodes_edges_and_truncation() {
        let text = JsonRenderer.render(&fixtures::ab_graph()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            value,
            json!({
                "nodes": [
                    {"id": "a", "label": "a", "resources": ["a"]},
                    {"id": "a,b", "label": "a\nb", "resources": ["a", "b"]},
                    {"id": "empty", "label": "empty", "resources": []}
                ],
                "edges": [
                    {"from": "empty", "to": "a", "rule": "create_a"},
                    {"from": "a", "to": "a,b", "rule": "create_b_from_a"},
                    {"from": "a", "to": "empty", "rule": "delete_a"},
                    {"from": "a,b", "to": "a", "rule": "delete_b"}
                ],
                "truncated": false
            })
        );
    }

    #[test]
    fn output_is_stable() {
        let first = JsonRenderer.render(&fixtures::ab_graph()).unwrap();
        let second = JsonRenderer.render(&fixtures::ab_graph()).unwrap();

        assert_eq!(first, second);
    }
}
