use super::{join_or_create, required};
use blockpress_core::{Block, ContentResult, Node, SerializeContext, Serialized};
use serde_json::json;

/// Tag reference, creating the tag itself alongside the join record
///
/// Authored data: `{ name }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipTagBlock;

impl Block for RelationshipTagBlock {
    fn block_type(&self) -> &str {
        "relationshipTag"
    }

    fn serialize(&self, _ctx: &SerializeContext<'_>, node: &Node) -> ContentResult<Serialized> {
        join_or_create(node, |data| {
            let name = required(self.block_type(), data, "name")?;
            Ok(json!({ "tag": { "create": { "name": name } } }))
        })
    }
}

/// Reference to an existing user
///
/// Authored data: `{ id }`, the user's id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipUserBlock;

impl Block for RelationshipUserBlock {
    fn block_type(&self) -> &str {
        "relationshipUser"
    }

    fn serialize(&self, _ctx: &SerializeContext<'_>, node: &Node) -> ContentResult<Serialized> {
        join_or_create(node, |data| {
            let user = required(self.block_type(), data, "id")?;
            Ok(json!({ "user": { "connect": { "id": user } } }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpress_core::{ContentError, Mutations};
    use serde_json::Value;

    fn run(block: &dyn Block, data: Value) -> ContentResult<Serialized> {
        let node = Node::block(block.block_type(), data.as_object().cloned().unwrap_or_default());
        let doc = Node::document(vec![node.clone()]);
        block.serialize(&SerializeContext::new(&doc), &node)
    }

    #[test]
    fn test_tag_create() {
        let out = run(&RelationshipTagBlock, json!({ "name": "foobar" })).unwrap();
        assert_eq!(
            out.mutations,
            Mutations::create(json!({ "tag": { "create": { "name": "foobar" } } }))
        );
    }

    #[test]
    fn test_tag_requires_name() {
        assert!(matches!(
            run(&RelationshipTagBlock, json!({})),
            Err(ContentError::InvalidBlockData { .. })
        ));
    }

    #[test]
    fn test_user_connects_existing_join() {
        let out = run(&RelationshipUserBlock, json!({ "_joinId": "xyz789", "id": "uoi678" })).unwrap();
        assert_eq!(out.mutations, Mutations::connect(json!({ "id": "xyz789" })));
    }

    #[test]
    fn test_user_create_links_user() {
        let out = run(&RelationshipUserBlock, json!({ "id": "uoi678" })).unwrap();
        assert_eq!(
            out.mutations,
            Mutations::create(json!({ "user": { "connect": { "id": "uoi678" } } }))
        );
    }
}
