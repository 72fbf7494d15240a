//! Built-in Content blocks.
//!
//! Each persisted block follows the same rule: a block that already carries
//! a `_joinId` is connected to its existing record, anything else is created.
//! The pruned node keeps the block's identity and drops its data; the
//! serializer then records where its payload went.

mod cloudinary_image;
mod editor_only;
mod relationship;

pub use cloudinary_image::{CloudinaryImageBlock, ALIGNMENTS};
pub use editor_only::EditorOnlyBlock;
pub use relationship::{RelationshipTagBlock, RelationshipUserBlock};

use crate::loader::LoadedBlock;
use blockpress_core::{ContentError, ContentResult, Data, Mutations, Node, Serialized};
use serde_json::{json, Value};
use std::sync::Arc;

/// Connect to the joined record, or create one from the node's data
pub(crate) fn join_or_create(
    node: &Node,
    create: impl FnOnce(&Data) -> ContentResult<Value>,
) -> ContentResult<Serialized> {
    let empty = Data::new();
    let data = node.data.as_ref().unwrap_or(&empty);

    let mutations = match node.join_id() {
        Some(id) => Mutations::connect(json!({ "id": id })),
        None => Mutations::create(create(data)?),
    };

    let mut pruned = node.shallow_clone();
    pruned.data = Some(Data::new());

    Ok(Serialized::new(mutations, pruned))
}

/// Required, non-null data field
pub(crate) fn required<'a>(block_type: &str, data: &'a Data, key: &str) -> ContentResult<&'a Value> {
    data.get(key)
        .filter(|value| !value.is_null())
        .ok_or_else(|| ContentError::invalid_data(block_type, format!("'{}' is required", key)))
}

/// Every block shipped with this crate, with its dependencies
pub fn builtin_blocks() -> Vec<LoadedBlock> {
    vec![
        LoadedBlock::new(Arc::new(CloudinaryImageBlock::default()))
            .with_dependencies(["image", "caption"]),
        LoadedBlock::new(Arc::new(RelationshipTagBlock)),
        LoadedBlock::new(Arc::new(RelationshipUserBlock)),
        LoadedBlock::new(Arc::new(EditorOnlyBlock::new("image"))),
        LoadedBlock::new(Arc::new(EditorOnlyBlock::new("caption"))),
    ]
}

/// Block types that persist data, in catalog order
pub fn builtin_persisted_types() -> Vec<String> {
    builtin_blocks()
        .into_iter()
        .filter(|block| !block.handler.capabilities().is_none())
        .map(|block| block.handler.block_type().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_persisted_types() {
        assert_eq!(
            builtin_persisted_types(),
            vec!["cloudinaryImage", "relationshipTag", "relationshipUser"]
        );
    }
}
