//! # Deserializer
//!
//! Rehydrates a persisted document: every block carrying a join reference is
//! matched with the resolved record of the same `id` under its handler's
//! path, and the record is merged into the block's data.
//!
//! Blocks without a join reference, of unregistered types, or whose path has
//! no record list are left untouched. A join reference with no matching
//! record is a data-integrity fault and fails the whole call.

use crate::errors::{ContentError, ContentResult};
use crate::node::{reference_label, Data, Node};
use crate::registry::BlockRegistry;
use crate::walker::{walk, Visited, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// A persisted document together with the records its blocks point at
///
/// ```text
/// {
///   "document": { ... { type: 'cloudinaryImage', data: { _joinId: 'abc123' } } ... },
///   "cloudinaryImages": [ { "id": "abc123", "publicUrl": "...", "align": "center" } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub document: Node,

    /// Resolved records keyed by block path
    #[serde(flatten)]
    pub records: Map<String, Value>,
}

impl ResolvedDocument {
    pub fn new(document: Node) -> Self {
        Self {
            document,
            records: Map::new(),
        }
    }

    /// Attach the records resolved for `path`
    pub fn with_records(mut self, path: impl Into<String>, records: Vec<Value>) -> Self {
        self.records.insert(path.into(), Value::Array(records));
        self
    }
}

struct Deserializer<'a> {
    registry: &'a BlockRegistry,
    records: &'a Map<String, Value>,
}

impl Visitor for Deserializer<'_> {
    type Error = ContentError;

    fn visit_block(&mut self, node: &Node) -> ContentResult<Option<Visited>> {
        let join_ids = node.join_ids();
        if join_ids.is_empty() {
            return Ok(None);
        }

        let Some(block) = self.registry.for_node(node) else {
            return Ok(None);
        };
        let Some(Value::Array(candidates)) = self.records.get(block.path()) else {
            return Ok(None);
        };

        let matched = join_ids
            .iter()
            .map(|join_id| {
                find_record(candidates, join_id).ok_or_else(|| ContentError::UnresolvedReference {
                    path: block.path().to_string(),
                    reference: reference_label(join_id),
                })
            })
            .collect::<ContentResult<Vec<&Data>>>()?;

        debug!(
            block_type = %block.block_type(),
            records = matched.len(),
            "Rehydrated block"
        );

        let rehydrated = block.handler().deserialize(node, &matched)?;
        Ok(Some(Visited::new(rehydrated)))
    }
}

fn find_record<'v>(candidates: &'v [Value], join_id: &Value) -> Option<&'v Data> {
    candidates
        .iter()
        .filter_map(Value::as_object)
        .find(|record| record.get("id") == Some(join_id))
}

/// Rehydrate a persisted document from its resolved records
#[instrument(skip_all, fields(paths = resolved.records.len()))]
pub fn deserialize(resolved: &ResolvedDocument, registry: &BlockRegistry) -> ContentResult<Node> {
    let mut deserializer = Deserializer {
        registry,
        records: &resolved.records,
    };
    walk(&mut deserializer, &resolved.document)
}
