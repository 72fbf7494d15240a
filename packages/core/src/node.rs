//! # Document Tree
//!
//! The rich-text document as produced by the editor: a tree of `document`,
//! `block`, `inline` and `text` nodes.
//!
//! Block-specific fields live in the schemaless `data` map. The core never
//! interprets them beyond the bookkeeping keys below; each block handler
//! documents the shape it expects.
//!
//! ## JSON form
//!
//! ```text
//! { "kind": "block", "type": "cloudinaryImage", "data": { ... }, "children": [ ... ] }
//! ```
//!
//! The editor's own spelling (`object` / `nodes`) is accepted on input.
//! Any other keys (text leaves, marks, keys) are carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Block-specific payload of a node
pub type Data = Map<String, Value>;

/// Data key holding the mutation paths recorded by the serializer
pub const MUTATION_PATHS_KEY: &str = "_mutationPaths";

/// Data key holding a single join reference
pub const JOIN_ID_KEY: &str = "_joinId";

/// Data key holding several join references
pub const JOIN_IDS_KEY: &str = "_joinIds";

/// Node kind tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Document,
    Block,
    Inline,
    Text,
    /// Any kind the core does not know about, preserved verbatim
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Block => "block",
            NodeKind::Inline => "inline",
            NodeKind::Text => "text",
            NodeKind::Other(kind) => kind,
        }
    }
}

impl From<String> for NodeKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "document" => NodeKind::Document,
            "block" => NodeKind::Block,
            "inline" => NodeKind::Inline,
            "text" => NodeKind::Text,
            _ => NodeKind::Other(kind),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the rich-text document tree
///
/// Child order is significant and is preserved by every transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(alias = "object")]
    pub kind: NodeKind,

    /// Type tag, meaningful for blocks and inlines
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,

    #[serde(alias = "nodes", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,

    /// Editor fields the core does not interpret (text leaves, marks, keys)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    fn empty(kind: NodeKind) -> Self {
        Self {
            kind,
            node_type: None,
            data: None,
            children: None,
            extra: Map::new(),
        }
    }

    /// Create a document node
    pub fn document(children: Vec<Node>) -> Self {
        Self {
            children: Some(children),
            ..Self::empty(NodeKind::Document)
        }
    }

    /// Create a block node with the given type and data
    pub fn block(node_type: impl Into<String>, data: Data) -> Self {
        Self {
            node_type: Some(node_type.into()),
            data: Some(data),
            ..Self::empty(NodeKind::Block)
        }
    }

    /// Create an inline node with the given type
    pub fn inline(node_type: impl Into<String>) -> Self {
        Self {
            node_type: Some(node_type.into()),
            ..Self::empty(NodeKind::Inline)
        }
    }

    /// Create a text leaf
    pub fn text(text: impl Into<String>) -> Self {
        let mut node = Self::empty(NodeKind::Text);
        node.extra.insert("text".to_string(), Value::String(text.into()));
        node
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_block(&self) -> bool {
        self.kind == NodeKind::Block
    }

    pub fn block_type(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    /// Look up a data field
    pub fn data_value(&self, key: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(key))
    }

    /// Mutable data map, created if absent
    pub fn data_mut(&mut self) -> &mut Data {
        self.data.get_or_insert_with(Map::new)
    }

    /// Copy of this node without its children
    ///
    /// Used by the walker so an unvisited subtree is never cloned just to be
    /// replaced by its walked counterpart.
    pub fn shallow_clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            node_type: self.node_type.clone(),
            data: self.data.clone(),
            children: None,
            extra: self.extra.clone(),
        }
    }

    /// Mutation paths recorded on this node by the serializer
    pub fn mutation_paths(&self) -> Vec<&str> {
        match self.data_value(MUTATION_PATHS_KEY) {
            Some(Value::Array(paths)) => paths.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Single join reference, if set
    pub fn join_id(&self) -> Option<&Value> {
        self.data_value(JOIN_ID_KEY).filter(|id| is_reference(id))
    }

    /// Join references carried by a persisted block
    ///
    /// `_joinId` takes precedence over `_joinIds`. Null and empty ids are ignored.
    pub fn join_ids(&self) -> Vec<&Value> {
        if let Some(id) = self.join_id() {
            return vec![id];
        }

        match self.data_value(JOIN_IDS_KEY) {
            Some(Value::Array(ids)) => ids.iter().filter(|id| is_reference(id)).collect(),
            _ => Vec::new(),
        }
    }
}

/// Render a join id the way it appears in error messages
fn is_reference(id: &Value) -> bool {
    match id {
        Value::Null => false,
        Value::String(id) => !id.is_empty(),
        _ => true,
    }
}

pub(crate) fn reference_label(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
