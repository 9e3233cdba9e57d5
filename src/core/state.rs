//! Canonically identified states.
//!
//! A [`State`] is an immutable snapshot of resources. Two representations are
//! supported: an ordered set of string tags and a key/value map of JSON
//! values. Both derive a canonical [`StateId`] from their content, so two
//! states built from the same logical content in any order share one id, and
//! two states with different content never do.

use super::error::EvalError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Canonical id of any state without resources.
pub const EMPTY_ID: &str = "empty";

/// Canonical identity of a [`State`].
///
/// Equal ids imply equal content and vice versa. Ids order lexicographically,
/// which is the order graph nodes are listed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    /// The id shared by every empty state.
    pub fn empty() -> Self {
        Self(EMPTY_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is the empty-state sentinel.
    pub fn is_empty_state(&self) -> bool {
        self.0 == EMPTY_ID
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The shape of a state's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Ordered, deduplicated set of string tags.
    Tags,
    /// Map from resource key to JSON value.
    Resources,
}

impl Representation {
    /// Canonicalize content produced for a state of this representation.
    ///
    /// This is the state constructor a rule set hands to the explorer: content
    /// of any other representation is rejected instead of becoming a node.
    pub fn construct(self, content: StateContent) -> Result<State, EvalError> {
        if content.representation() != self {
            return Err(EvalError::WrongRepresentation {
                expected: self,
                found: content.representation(),
            });
        }
        Ok(State::new(content))
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tags => f.write_str("tags"),
            Self::Resources => f.write_str("resources"),
        }
    }
}

/// Raw state content, as produced by a rule source or a rule effect.
///
/// Content is not canonical until it is turned into a [`State`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateContent {
    Tags(Vec<String>),
    Resources(BTreeMap<String, Value>),
}

impl StateContent {
    /// Build tag content from any iterable of strings.
    pub fn tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Tags(tags.into_iter().map(Into::into).collect())
    }

    /// Build key/value content. Later duplicates of a key win.
    pub fn resources<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Resources(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn representation(&self) -> Representation {
        match self {
            Self::Tags(_) => Representation::Tags,
            Self::Resources(_) => Representation::Resources,
        }
    }
}

/// An immutable, canonically identified snapshot of resources.
///
/// # Example
///
/// ```rust
/// use blindspot::core::State;
///
/// let first = State::from_tags(["b", "a", "b"]);
/// let second = State::from_tags(["a", "b"]);
///
/// assert_eq!(first, second);
/// assert_eq!(first.id().as_str(), "a,b");
/// assert_eq!(State::from_tags(Vec::<String>::new()).id().as_str(), "empty");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct State {
    id: StateId,
    content: StateContent,
}

impl State {
    /// Canonicalize raw content into a state.
    ///
    /// Tags drop empty strings, duplicates are removed and the rest sorted.
    /// Resources drop empty keys.
    pub fn new(content: StateContent) -> Self {
        let content = match content {
            StateContent::Tags(tags) => StateContent::Tags(
                tags.into_iter()
                    .filter(|tag| !tag.is_empty())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
            ),
            StateContent::Resources(map) => StateContent::Resources(
                map.into_iter().filter(|(key, _)| !key.is_empty()).collect(),
            ),
        };
        let id = derive_id(&content);
        Self { id, content }
    }

    pub fn from_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(StateContent::tags(tags))
    }

    pub fn from_resources<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::new(StateContent::resources(pairs))
    }

    /// The empty state of a representation.
    pub fn empty(representation: Representation) -> Self {
        match representation {
            Representation::Tags => Self::new(StateContent::Tags(Vec::new())),
            Representation::Resources => Self::new(StateContent::Resources(BTreeMap::new())),
        }
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }

    pub fn content(&self) -> &StateContent {
        &self.content
    }

    pub fn into_content(self) -> StateContent {
        self.content
    }

    pub fn representation(&self) -> Representation {
        self.content.representation()
    }

    /// Check whether the state holds no resources.
    pub fn is_empty(&self) -> bool {
        match &self.content {
            StateContent::Tags(tags) => tags.is_empty(),
            StateContent::Resources(map) => map.is_empty(),
        }
    }

    /// Sorted tags, or a representation error for key/value states.
    pub fn require_tags(&self) -> Result<&[String], EvalError> {
        match &self.content {
            StateContent::Tags(tags) => Ok(tags),
            StateContent::Resources(_) => Err(EvalError::WrongRepresentation {
                expected: Representation::Tags,
                found: Representation::Resources,
            }),
        }
    }

    /// Resource map, or a representation error for tag states.
    pub fn require_resources(&self) -> Result<&BTreeMap<String, Value>, EvalError> {
        match &self.content {
            StateContent::Resources(map) => Ok(map),
            StateContent::Tags(_) => Err(EvalError::WrongRepresentation {
                expected: Representation::Resources,
                found: Representation::Tags,
            }),
        }
    }

    /// Check for a tag. Always false on key/value states.
    pub fn contains_tag(&self, tag: &str) -> bool {
        match &self.content {
            StateContent::Tags(tags) => tags.binary_search_by(|t| t.as_str().cmp(tag)).is_ok(),
            StateContent::Resources(_) => false,
        }
    }

    /// Look up a resource value. Always `None` on tag states.
    pub fn resource(&self, key: &str) -> Option<&Value> {
        match &self.content {
            StateContent::Resources(map) => map.get(key),
            StateContent::Tags(_) => None,
        }
    }

    /// Human-readable lines describing the state.
    ///
    /// One line per tag, or one `key:value` line per resource with the value
    /// in JSON form. The empty state renders as a single `empty` line.
    pub fn labels(&self) -> Vec<String> {
        if self.is_empty() {
            return vec![EMPTY_ID.to_string()];
        }
        match &self.content {
            StateContent::Tags(tags) => tags.clone(),
            StateContent::Resources(map) => map
                .iter()
                .map(|(key, value)| format!("{key}:{value}"))
                .collect(),
        }
    }

    /// Labels joined with a separator.
    pub fn label(&self, separator: &str) -> String {
        self.labels().join(separator)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.representation() == other.representation()
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.representation().hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl From<StateContent> for State {
    fn from(content: StateContent) -> Self {
        Self::new(content)
    }
}

fn derive_id(content: &StateContent) -> StateId {
    let mut id = String::new();
    match content {
        StateContent::Tags(tags) => {
            for (i, tag) in tags.iter().enumerate() {
                if i > 0 {
                    id.push(',');
                }
                if tag == EMPTY_ID {
                    id.push('\\');
                }
                escape_into(tag, &['\\', ','], &mut id);
            }
        }
        StateContent::Resources(map) => {
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    id.push(',');
                }
                escape_into(key, &['\\', ',', ':'], &mut id);
                id.push(':');
                // serde_json objects are key-sorted, so nested values are stable too.
                id.push_str(&value.to_string());
            }
        }
    }
    if id.is_empty() {
        StateId::empty()
    } else {
        StateId(id)
    }
}

fn escape_into(raw: &str, special: &[char], out: &mut String) {
    for c in raw.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}
