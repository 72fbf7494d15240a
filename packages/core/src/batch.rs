//! # Mutation Batches
//!
//! Payloads collected during serialization, grouped by block path and then
//! by action. The index of a payload inside its action list is embedded in
//! the pruned document as a [`MutationPath`], so it must never move once
//! recorded.
//!
//! ```text
//! {
//!   "document": { ... _mutationPaths: ["cloudinaryImages.create[0]"] ... },
//!   "cloudinaryImages": { "create": [ { "image": ..., "align": "center" } ] }
//! }
//! ```
//!
//! [`assemble`] turns a [`Serialization`] into the envelope the persistence
//! layer executes, adding `disconnectAll: true` to every path it keeps.

use crate::block::{Action, Mutations};
use crate::errors::ContentError;
use crate::node::Node;
use crate::registry::BlockRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Address of one payload: `<path>.<action>[<index>]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationPath {
    pub path: String,
    pub action: Action,
    pub index: usize,
}

impl fmt::Display for MutationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}]", self.path, self.action, self.index)
    }
}

impl FromStr for MutationPath {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ContentError::InvalidMutationPath(s.to_string());

        let (head, index) = s
            .strip_suffix(']')
            .and_then(|rest| rest.rsplit_once('['))
            .ok_or_else(invalid)?;
        let (path, action) = head.rsplit_once('.').ok_or_else(invalid)?;

        if path.is_empty() {
            return Err(invalid());
        }

        Ok(MutationPath {
            path: path.to_string(),
            action: action.parse().map_err(|_| invalid())?,
            index: index.parse().map_err(|_| invalid())?,
        })
    }
}

/// Payloads for one block path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionBatch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connect: Vec<Value>,
}

impl ActionBatch {
    pub fn get(&self, action: Action) -> &[Value] {
        match action {
            Action::Create => &self.create,
            Action::Connect => &self.connect,
        }
    }

    /// Append a payload and return its index
    pub fn push(&mut self, action: Action, payload: Value) -> usize {
        let list = match action {
            Action::Create => &mut self.create,
            Action::Connect => &mut self.connect,
        };
        list.push(payload);
        list.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.connect.is_empty()
    }
}

/// Action batches keyed by block path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationBatches {
    paths: BTreeMap<String, ActionBatch>,
}

impl MutationBatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty batch per registered path
    pub fn for_registry(registry: &BlockRegistry) -> Self {
        let paths = registry
            .iter()
            .map(|block| (block.path().to_string(), ActionBatch::default()))
            .collect();
        Self { paths }
    }

    /// Append every payload under `path`, returning their mutation paths in order
    pub fn record(&mut self, path: &str, mutations: Mutations) -> Vec<MutationPath> {
        let batch = self.paths.entry(path.to_string()).or_default();
        let mut recorded = Vec::new();

        for (action, payloads) in mutations.into_entries() {
            for payload in payloads {
                let index = batch.push(action, payload);
                recorded.push(MutationPath {
                    path: path.to_string(),
                    action,
                    index,
                });
            }
        }

        recorded
    }

    pub fn get(&self, path: &str) -> Option<&ActionBatch> {
        self.paths.get(path)
    }

    /// Payload at a mutation path
    pub fn resolve(&self, mutation_path: &MutationPath) -> Option<&Value> {
        self.get(&mutation_path.path)
            .and_then(|batch| batch.get(mutation_path.action).get(mutation_path.index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionBatch)> {
        self.paths.iter().map(|(path, batch)| (path.as_str(), batch))
    }

    pub fn paths(&self) -> Vec<&str> {
        self.paths.keys().map(String::as_str).collect()
    }

    /// True when no path received any payload
    pub fn is_empty(&self) -> bool {
        self.paths.values().all(ActionBatch::is_empty)
    }

    /// Total number of recorded payloads
    pub fn len(&self) -> usize {
        self.paths
            .values()
            .map(|batch| batch.create.len() + batch.connect.len())
            .sum()
    }
}

impl FromIterator<(String, ActionBatch)> for MutationBatches {
    fn from_iter<T: IntoIterator<Item = (String, ActionBatch)>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

/// Output of [`crate::serialize`]: the pruned tree plus every registered path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serialization {
    pub document: Node,

    #[serde(flatten)]
    pub batches: MutationBatches,
}

/// Instructions for one path in the final envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMutation {
    /// Drop every existing link for this path before applying the rest.
    // TODO: diff against the stored relationships instead of relinking everything.
    pub disconnect_all: bool,
    pub create: Vec<Value>,
    pub connect: Vec<Value>,
}

/// Envelope handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationEnvelope {
    pub document: Node,

    #[serde(flatten)]
    pub paths: BTreeMap<String, PathMutation>,
}

/// Build the final envelope
///
/// Paths that received no payload are omitted. Kept paths always carry both
/// `create` and `connect`, empty or not.
pub fn assemble(serialization: Serialization) -> MutationEnvelope {
    let Serialization { document, batches } = serialization;

    let paths = batches
        .paths
        .into_iter()
        .filter(|(_, batch)| !batch.is_empty())
        .map(|(path, ActionBatch { create, connect })| {
            (
                path,
                PathMutation {
                    disconnect_all: true,
                    create,
                    connect,
                },
            )
        })
        .collect();

    MutationEnvelope { document, paths }
}
