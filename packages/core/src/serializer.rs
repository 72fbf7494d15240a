//! # Serializer
//!
//! Walks a document and hands every registered block to its handler. The
//! payloads a handler emits are appended to the batch for the handler's
//! path, and the pruned node records where each payload landed:
//!
//! ```text
//! { type: 'cloudinaryImage', data: { file, align } }
//!     → node:  { type: 'cloudinaryImage', data: { _mutationPaths: ['cloudinaryImages.create[0]'] } }
//!     → batch: cloudinaryImages.create[0] = { image: file, align }
//! ```
//!
//! Blocks of unregistered types are projected unchanged (children still
//! walked) so a later stage can handle them.

use crate::batch::{MutationBatches, Serialization};
use crate::block::{SerializeContext, Serialized};
use crate::editor::Editor;
use crate::errors::{ContentError, ContentResult};
use crate::node::{Node, MUTATION_PATHS_KEY};
use crate::registry::BlockRegistry;
use crate::walker::{walk, Visited, Visitor};
use serde_json::Value;
use tracing::{debug, info, instrument};

struct Serializer<'a> {
    registry: &'a BlockRegistry,
    context: SerializeContext<'a>,
    batches: MutationBatches,
}

impl Visitor for Serializer<'_> {
    type Error = ContentError;

    fn visit_block(&mut self, node: &Node) -> ContentResult<Option<Visited>> {
        // Not ours: leave it for whoever owns it
        let Some(block) = self.registry.for_node(node) else {
            return Ok(None);
        };

        let Serialized {
            mutations,
            node: serialized,
            is_final,
        } = block.handler().serialize(&self.context, node)?;

        if mutations.is_empty() {
            return Ok(serialized.map(|node| Visited { node, is_final }));
        }

        let mut serialized = serialized.ok_or_else(|| ContentError::ContractViolation {
            block_type: block.block_type().to_string(),
        })?;

        let recorded = self.batches.record(block.path(), mutations);
        debug!(
            block_type = %block.block_type(),
            mutations = recorded.len(),
            "Serialized block"
        );

        let data = serialized.data_mut();
        let paths = data
            .entry(MUTATION_PATHS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !paths.is_array() {
            *paths = Value::Array(Vec::new());
        }
        if let Value::Array(paths) = paths {
            paths.extend(recorded.iter().map(|path| Value::String(path.to_string())));
        }

        Ok(Some(Visited {
            node: serialized,
            is_final,
        }))
    }
}

/// Serialize a document snapshot against a registry
///
/// Every registered path is present in the result, empty or not.
#[instrument(skip(document, registry), fields(blocks = registry.len()))]
pub fn serialize(document: &Node, registry: &BlockRegistry) -> ContentResult<Serialization> {
    let mut serializer = Serializer {
        registry,
        context: SerializeContext::new(document),
        batches: MutationBatches::for_registry(registry),
    };

    let document = walk(&mut serializer, document)?;
    let batches = serializer.batches;

    info!(mutations = batches.len(), "Document serialization complete");

    Ok(Serialization { document, batches })
}

/// Serialize the document held by an editor
///
/// The editor is leased for the duration of the walk: it is read-only and
/// cannot be leased again until this returns, on success or failure.
pub fn serialize_editor(editor: &Editor, registry: &BlockRegistry) -> ContentResult<Serialization> {
    let lease = editor.lease()?;
    serialize(lease.document(), registry)
}
