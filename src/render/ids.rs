//! Stable node identifiers for graph notations.

use super::RenderError;
use crate::core::{State, StateId, EMPTY_ID};
use std::collections::{HashMap, HashSet};

/// Maps canonical state ids to identifiers safe in a target notation.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`. When two states
/// sanitize to the same identifier, or an identifier is reserved by the
/// notation, the later one in sorted-node order gets the first free `_N`
/// suffix. The empty state is always `empty`.
#[derive(Debug, Clone, Default)]
pub struct NodeIds {
    ids: HashMap<StateId, String>,
}

impl NodeIds {
    pub fn new(nodes: &[State], reserved: &[&str]) -> Self {
        let mut used: HashSet<String> = reserved.iter().map(|r| r.to_string()).collect();
        let mut ids = HashMap::with_capacity(nodes.len());

        let (empty, others): (Vec<&State>, Vec<&State>) =
            nodes.iter().partition(|node| node.id().is_empty_state());
        for node in empty.into_iter().chain(others) {
            let base = sanitize(node.id());
            let mut candidate = base.clone();
            let mut suffix = 1;
            while used.contains(&candidate) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            used.insert(candidate.clone());
            ids.insert(node.id().clone(), candidate);
        }

        Self { ids }
    }

    pub fn get(&self, id: &StateId) -> Result<&str, RenderError> {
        self.ids
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| RenderError::UnknownNode { id: id.clone() })
    }
}

fn sanitize(id: &StateId) -> String {
    if id.is_empty_state() {
        return EMPTY_ID.to_string();
    }
    id.as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resources, tags};

    #[test]
    fn separators_become_underscores() {
        let nodes = vec![tags!["a", "b"], resources! { "status" => "on" }];
        let ids = NodeIds::new(&nodes, &[]);

        assert_eq!(ids.get(nodes[0].id()).unwrap(), "a_b");
        assert_eq!(ids.get(nodes[1].id()).unwrap(), "status__on_");
    }

    #[test]
    fn collisions_get_numbered_suffixes() {
        let nodes = vec![tags!["a-b"], tags!["a.b"], tags!["a_b"]];
        let ids = NodeIds::new(&nodes, &[]);

        assert_eq!(ids.get(nodes[0].id()).unwrap(), "a_b");
        assert_eq!(ids.get(nodes[1].id()).unwrap(), "a_b_1");
        assert_eq!(ids.get(nodes[2].id()).unwrap(), "a_b_2");
    }

    #[test]
    fn empty_state_keeps_its_name() {
        let nodes = vec![tags!["empty"], tags![]];
        let ids = NodeIds::new(&nodes, &[]);

        assert_eq!(ids.get(&StateId::empty()).unwrap(), "empty");
        assert_eq!(ids.get(nodes[0].id()).unwrap(), "_empty");
    }

    #[test]
    fn reserved_words_are_avoided() {
        let nodes = vec![tags!["end"]];
        let ids = NodeIds::new(&nodes, &["end"]);

        assert_eq!(ids.get(nodes[0].id()).unwrap(), "end_1");
    }

    #[test]
    fn unknown_ids_are_an_error() {
        let ids = NodeIds::new(&[], &[]);

        assert!(matches!(
            ids.get(&StateId::empty()),
            Err(RenderError::UnknownNode { .. })
        ));
    }
}
