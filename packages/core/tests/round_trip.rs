//! End-to-end tests: serialize → assemble → (simulated persist) → link → deserialize

use blockpress_core::{
    assemble, deserialize, link, serialize, serialize_editor, ActionBatch, Block, BlockRegistry,
    ContentError, ContentResult, Data, Editor, MutationBatches, Mutations, Node, ResolvedDocument,
    SerializeContext, Serialized,
};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug)]
struct ImageBlock;

impl Block for ImageBlock {
    fn block_type(&self) -> &str {
        "cloudinaryImage"
    }

    fn serialize(&self, _ctx: &SerializeContext<'_>, node: &Node) -> ContentResult<Serialized> {
        let mutations = match node.data_value("_joinId") {
            Some(id) => Mutations::connect(json!({ "id": id })),
            None => Mutations::create(json!({
                "image": node.data_value("file").cloned().unwrap_or(Value::Null),
                "align": node.data_value("align").cloned().unwrap_or(json!("center")),
            })),
        };
        Ok(Serialized::new(mutations, Node::block(self.block_type(), Data::new())))
    }
}

#[derive(Debug)]
struct TagBlock;

impl Block for TagBlock {
    fn block_type(&self) -> &str {
        "relationshipTag"
    }

    fn serialize(&self, _ctx: &SerializeContext<'_>, node: &Node) -> ContentResult<Serialized> {
        let name = node.data_value("name").cloned().unwrap_or(Value::Null);
        Ok(Serialized::new(
            Mutations::create(json!({ "tag": { "create": { "name": name } } })),
            Node::block(self.block_type(), Data::new()),
        ))
    }
}

#[derive(Debug)]
struct ExplodingBlock;

impl Block for ExplodingBlock {
    fn block_type(&self) -> &str {
        "exploding"
    }

    fn serialize(&self, _ctx: &SerializeContext<'_>, _node: &Node) -> ContentResult<Serialized> {
        Err(ContentError::invalid_data("exploding", "always fails"))
    }
}

fn registry() -> BlockRegistry {
    BlockRegistry::new(vec![
        Arc::new(ImageBlock) as Arc<dyn Block>,
        Arc::new(TagBlock),
        Arc::new(ExplodingBlock),
    ])
    .unwrap()
}

fn document(children: Value) -> Node {
    serde_json::from_value(json!({ "kind": "document", "children": children })).unwrap()
}

fn file() -> Value {
    json!({ "name": "cat.png", "size": 1024 })
}

#[test]
fn test_image_and_tag_scenario() {
    let doc = document(json!([
        { "kind": "block", "type": "cloudinaryImage", "data": { "file": file(), "align": "center" } },
        { "kind": "block", "type": "relationshipTag", "data": { "name": "foobar" } }
    ]));

    let out = serialize(&doc, &registry()).unwrap();

    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!({
            "document": {
                "kind": "document",
                "children": [
                    { "kind": "block", "type": "cloudinaryImage", "data": { "_mutationPaths": ["cloudinaryImages.create[0]"] } },
                    { "kind": "block", "type": "relationshipTag", "data": { "_mutationPaths": ["relationshipTags.create[0]"] } }
                ]
            },
            "cloudinaryImages": { "create": [{ "image": file(), "align": "center" }] },
            "explodings": {},
            "relationshipTags": { "create": [{ "tag": { "create": { "name": "foobar" } } }] }
        })
    );
}

#[test]
fn test_same_type_blocks_keep_document_order() {
    let doc = document(json!([
        { "kind": "block", "type": "cloudinaryImage", "data": { "file": "a" } },
        { "kind": "block", "type": "cloudinaryImage", "data": { "file": "b" } },
        { "kind": "block", "type": "cloudinaryImage", "data": { "file": "c" } }
    ]));

    let out = serialize(&doc, &registry()).unwrap();
    let paths: Vec<Vec<&str>> = out
        .document
        .children
        .as_ref()
        .unwrap()
        .iter()
        .map(Node::mutation_paths)
        .collect();

    assert_eq!(
        paths,
        vec![
            vec!["cloudinaryImages.create[0]"],
            vec!["cloudinaryImages.create[1]"],
            vec!["cloudinaryImages.create[2]"],
        ]
    );

    let images: Vec<&Value> = out.batches.get("cloudinaryImages").unwrap().create.iter().map(|p| &p["image"]).collect();
    assert_eq!(images, vec![&json!("a"), &json!("b"), &json!("c")]);
}

#[test]
fn test_document_without_registered_blocks_is_unchanged() {
    let doc = document(json!([
        { "kind": "block", "type": "paragraph", "children": [
            { "kind": "text", "leaves": [{ "text": "hello", "marks": [] }] },
            { "kind": "inline", "type": "link", "data": { "href": "/x" }, "children": [{ "kind": "text", "text": "x" }] }
        ]},
        { "kind": "block", "type": "video", "data": { "url": "https://v" } }
    ]));

    let out = serialize(&doc, &registry()).unwrap();

    assert_eq!(out.document, doc);
    assert!(out.batches.is_empty());
    assert!(assemble(out).paths.is_empty());
}

#[test]
fn test_handler_failure_releases_lease() {
    let editor = Editor::new(document(json!([
        { "kind": "block", "type": "cloudinaryImage", "data": { "file": "a" } },
        { "kind": "block", "type": "exploding", "data": {} }
    ])));

    for read_only in [false, true] {
        editor.set_read_only(read_only);

        let err = serialize_editor(&editor, &registry()).unwrap_err();
        assert!(matches!(err, ContentError::InvalidBlockData { .. }));
        assert_eq!(editor.is_read_only(), read_only);

        // lease was released: a new one can be taken
        drop(editor.lease().unwrap());
    }
}

#[test]
fn test_full_round_trip_restores_resolved_fields() {
    let original = document(json!([
        { "kind": "block", "type": "cloudinaryImage", "data": { "file": "a", "align": "left" } },
        { "kind": "block", "type": "paragraph", "children": [{ "kind": "text", "text": "between" }] },
        { "kind": "block", "type": "cloudinaryImage", "data": { "_joinId": "existing" } }
    ]));

    let editor = Editor::new(original.clone());
    let envelope = assemble(serialize_editor(&editor, &registry()).unwrap());

    let images = &envelope.paths["cloudinaryImages"];
    assert!(images.disconnect_all);
    assert_eq!(images.create.len(), 1);
    assert_eq!(images.connect, vec![json!({ "id": "existing" })]);

    // The persistence layer creates one record and connects the other
    let results: MutationBatches = vec![(
        "cloudinaryImages".to_string(),
        ActionBatch {
            create: vec![json!({ "id": "new-1" })],
            connect: vec![json!({ "id": "existing" })],
        },
    )]
    .into_iter()
    .collect();

    let stored = link(&envelope.document, &results).unwrap();
    let stored_children = stored.children.as_ref().unwrap();
    assert_eq!(stored_children[0].data_value("_joinId"), Some(&json!("new-1")));
    assert_eq!(stored_children[2].data_value("_joinId"), Some(&json!("existing")));

    let resolved = ResolvedDocument::new(stored).with_records(
        "cloudinaryImages",
        vec![
            json!({ "id": "existing", "publicUrl": "https://img/existing", "align": "right" }),
            json!({ "id": "new-1", "publicUrl": "https://img/new-1", "align": "left" }),
        ],
    );

    let restored = deserialize(&resolved, &registry()).unwrap();
    let children = restored.children.unwrap();

    assert_eq!(children[0].data_value("publicUrl"), Some(&json!("https://img/new-1")));
    assert_eq!(children[0].data_value("align"), Some(&json!("left")));
    assert_eq!(children[1], original.children.as_ref().unwrap()[1]);
    assert_eq!(children[2].data_value("publicUrl"), Some(&json!("https://img/existing")));
}

#[test]
fn test_resolved_document_from_json() {
    let resolved: ResolvedDocument = serde_json::from_value(json!({
        "document": {
            "object": "document",
            "nodes": [{ "object": "block", "type": "relationshipTag", "data": { "_joinId": "t1" } }]
        },
        "relationshipTags": [{ "id": "t1", "tag": { "id": "tag-9", "name": "foobar" } }]
    }))
    .unwrap();

    let doc = deserialize(&resolved, &registry()).unwrap();
    assert_eq!(
        doc.children.unwrap()[0].data_value("tag"),
        Some(&json!({ "id": "tag-9", "name": "foobar" }))
    );
}

#[test]
fn test_unresolved_join_reference() {
    let resolved = ResolvedDocument::new(document(json!([
        { "kind": "block", "type": "relationshipTag", "data": { "_joinId": "zzz" } }
    ])))
    .with_records("relationshipTags", vec![json!({ "id": "t1" })]);

    assert!(matches!(
        deserialize(&resolved, &registry()),
        Err(ContentError::UnresolvedReference { .. })
    ));
}

#[test]
fn test_duplicate_registration() {
    let result = BlockRegistry::new(vec![Arc::new(ImageBlock) as Arc<dyn Block>, Arc::new(ImageBlock)]);
    assert!(matches!(result, Err(ContentError::RegistrationConflict { .. })));
}
