//! Join linking.
//!
//! Once the persistence layer has executed an envelope, each recorded
//! payload has produced (or connected) a record. `link` rewrites the
//! `_mutationPaths` placeholders of the pruned document into the join
//! references of those records, giving the form that is stored and later
//! deserialized.
//!
//! Results use the same layout as the batches: for every path, the ids of
//! the created and connected records in payload order. An entry may be a
//! bare id or a record object with an `id` field.

use crate::batch::{MutationBatches, MutationPath};
use crate::errors::{ContentError, ContentResult};
use crate::node::{Node, JOIN_IDS_KEY, JOIN_ID_KEY, MUTATION_PATHS_KEY};
use crate::walker::{walk, Visited, Visitor};
use serde_json::Value;
use tracing::instrument;

struct Linker<'a> {
    results: &'a MutationBatches,
}

impl Visitor for Linker<'_> {
    type Error = ContentError;

    fn visit_block(&mut self, node: &Node) -> ContentResult<Option<Visited>> {
        let paths = node.mutation_paths();
        if paths.is_empty() {
            return Ok(None);
        }

        let mut ids = Vec::with_capacity(paths.len());
        for raw in paths {
            let mutation_path: MutationPath = raw.parse()?;
            let id = self
                .results
                .resolve(&mutation_path)
                .and_then(record_id)
                .ok_or_else(|| ContentError::UnresolvedReference {
                    path: mutation_path.path.clone(),
                    reference: format!("{}[{}]", mutation_path.action, mutation_path.index),
                })?;
            ids.push(id.clone());
        }

        let mut linked = node.shallow_clone();
        let data = linked.data_mut();
        data.remove(MUTATION_PATHS_KEY);
        data.remove(JOIN_ID_KEY);
        data.remove(JOIN_IDS_KEY);

        if ids.len() == 1 {
            data.insert(JOIN_ID_KEY.to_string(), ids.remove(0));
        } else {
            data.insert(JOIN_IDS_KEY.to_string(), Value::Array(ids));
        }

        Ok(Some(Visited::new(linked)))
    }
}

fn record_id(entry: &Value) -> Option<&Value> {
    match entry {
        Value::Object(record) => record.get("id"),
        Value::Null => None,
        id => Some(id),
    }
}

/// Replace mutation-path placeholders with the join ids they produced
#[instrument(skip_all, fields(results = results.len()))]
pub fn link(document: &Node, results: &MutationBatches) -> ContentResult<Node> {
    walk(&mut Linker { results }, document)
}
