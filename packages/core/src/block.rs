//! # Block Handlers
//!
//! A block handler owns one block type: it knows how to turn an authored
//! block into create/connect mutation payloads, and how to merge a resolved
//! record back into a persisted block.
//!
//! Handlers are pure. They receive the document snapshot and the node, and
//! return data; they never touch the live editor.

use crate::errors::ContentResult;
use crate::inflect::pluralize;
use crate::node::{Data, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Mutation action a payload is grouped under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Connect,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Connect => "connect",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "connect" => Ok(Action::Connect),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// Which capabilities a handler actually provides
///
/// Editor-only blocks (toolbar helpers, captions) declare none and are kept
/// out of persistence registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub serialize: bool,
    pub deserialize: bool,
}

impl Capabilities {
    pub const FULL: Capabilities = Capabilities {
        serialize: true,
        deserialize: true,
    };

    pub const NONE: Capabilities = Capabilities {
        serialize: false,
        deserialize: false,
    };

    pub fn is_none(&self) -> bool {
        !self.serialize && !self.deserialize
    }
}

/// Mutation payloads emitted for one block, grouped by action
///
/// Payload order within an action is the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mutations {
    entries: BTreeMap<Action, Vec<Value>>,
}

impl Mutations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(payload: Value) -> Self {
        Self::new().with(Action::Create, payload)
    }

    pub fn connect(payload: Value) -> Self {
        Self::new().with(Action::Connect, payload)
    }

    /// Add one payload under `action`
    pub fn with(mut self, action: Action, payload: Value) -> Self {
        self.push(action, payload);
        self
    }

    /// Add several payloads under `action`, keeping their order
    pub fn with_many(mut self, action: Action, payloads: impl IntoIterator<Item = Value>) -> Self {
        self.entries.entry(action).or_default().extend(payloads);
        self
    }

    pub fn push(&mut self, action: Action, payload: Value) {
        self.entries.entry(action).or_default().push(payload);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    pub fn into_entries(self) -> impl Iterator<Item = (Action, Vec<Value>)> {
        self.entries.into_iter()
    }
}

/// What a handler returns from [`Block::serialize`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Serialized {
    pub mutations: Mutations,

    /// Pruned node to keep in the document. Required when `mutations` is non-empty.
    pub node: Option<Node>,

    /// The handler took ownership of the children; the walker stops here
    pub is_final: bool,
}

impl Serialized {
    /// The handler declines this node; it is projected as-is
    pub fn unhandled() -> Self {
        Self::default()
    }

    pub fn new(mutations: Mutations, node: Node) -> Self {
        Self {
            mutations,
            node: Some(node),
            is_final: false,
        }
    }

    pub fn finalized(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// Read-only view handed to a handler while serializing
#[derive(Debug, Clone, Copy)]
pub struct SerializeContext<'a> {
    document: &'a Node,
}

impl<'a> SerializeContext<'a> {
    pub fn new(document: &'a Node) -> Self {
        Self { document }
    }

    /// The whole document being serialized
    pub fn document(&self) -> &'a Node {
        self.document
    }
}

/// Handler for one block type
pub trait Block: Send + Sync + fmt::Debug {
    /// Type tag, unique within a registry
    fn block_type(&self) -> &str;

    /// Collection the block's mutations and records are grouped under
    fn path(&self) -> String {
        pluralize(self.block_type())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }

    /// Turn an authored block into mutations plus a pruned node
    fn serialize(&self, ctx: &SerializeContext<'_>, node: &Node) -> ContentResult<Serialized>;

    /// Merge resolved records into a persisted block
    ///
    /// Records are applied in order; resolved fields win on key collision.
    fn deserialize(&self, node: &Node, records: &[&Data]) -> ContentResult<Node> {
        // Children are walked and attached by the caller
        let mut merged = node.shallow_clone();

        let data = merged.data_mut();
        for record in records {
            for (key, value) in record.iter() {
                data.insert(key.clone(), value.clone());
            }
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutations_keep_insertion_order_per_action() {
        let mutations = Mutations::create(json!(1))
            .with(Action::Connect, json!({ "id": "a" }))
            .with_many(Action::Create, vec![json!(2), json!(3)]);

        let entries: Vec<_> = mutations.into_entries().collect();
        assert_eq!(
            entries,
            vec![
                (Action::Create, vec![json!(1), json!(2), json!(3)]),
                (Action::Connect, vec![json!({ "id": "a" })]),
            ]
        );
    }

    #[test]
    fn test_empty_action_lists_are_empty() {
        let mutations = Mutations::new().with_many(Action::Create, Vec::new());
        assert!(mutations.is_empty());
    }

    #[derive(Debug)]
    struct Plain;

    impl Block for Plain {
        fn block_type(&self) -> &str {
            "plain"
        }

        fn serialize(&self, _ctx: &SerializeContext<'_>, _node: &Node) -> ContentResult<Serialized> {
            Ok(Serialized::unhandled())
        }
    }

    #[test]
    fn test_default_deserialize_merges_without_children() {
        let mut node = Node::block("plain", Data::new()).with_children(vec![Node::text("kept by the walker")]);
        node.data_mut().insert("align".into(), json!("left"));

        let record = json!({ "id": "a", "align": "center" });
        let merged = Plain.deserialize(&node, &[record.as_object().unwrap()]).unwrap();

        assert!(merged.children.is_none());
        assert_eq!(merged.data_value("align"), Some(&json!("center")));
        assert_eq!(merged.data_value("id"), Some(&json!("a")));
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("connect".parse::<Action>(), Ok(Action::Connect));
        assert!("update".parse::<Action>().is_err());
    }
}
