//! # Content Field Controller
//!
//! Per-field glue between an item's Content value and the core transforms.
//!
//! ## Block resolution
//!
//! The first call that needs blocks loads every configured type and,
//! transitively, their dependencies. The result is cached on the controller
//! so later calls never load again. Dependencies are available to the editor
//! but get no UI chrome unless they are also configured directly. Editor-only
//! blocks (no persistence capabilities) are kept out of the registry.
//!
//! ## Values
//!
//! ```text
//! serialize:   Empty          → { "document": null }
//!              Stored(json)   → the stored value, parsed
//!              Editor(editor) → mutation envelope, document stringified
//!
//! deserialize: stored json    → rehydrated document tree
//! ```

use crate::config::ContentFieldConfig;
use crate::errors::{FieldError, FieldResult};
use crate::loader::{BlockLoader, LoadedBlock};
use blockpress_core::{
    assemble, deserialize, serialize_editor, BlockRegistry, Capabilities, Editor, MutationEnvelope, Node,
    ResolvedDocument,
};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// How a block is offered by this field
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSettings {
    /// Options from the field configuration
    pub options: Option<Value>,

    /// Configured directly on the field, not only pulled in as a dependency
    pub with_chrome: bool,

    pub capabilities: Capabilities,
}

/// Every block resolved for a field
#[derive(Debug)]
pub struct LoadedBlocks {
    registry: BlockRegistry,
    settings: BTreeMap<String, BlockSettings>,
}

impl LoadedBlocks {
    /// Registry of the blocks that persist data
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn settings(&self, block_type: &str) -> Option<&BlockSettings> {
        self.settings.get(block_type)
    }

    /// All resolved block types, editor-only ones included
    pub fn block_types(&self) -> Vec<&str> {
        self.settings.keys().map(String::as_str).collect()
    }
}

/// Current value of a Content field on an item
#[derive(Debug, Clone, Copy)]
pub enum FieldInput<'a> {
    Empty,
    /// JSON string as sent by the server
    Stored(&'a str),
    /// Live editor state
    Editor(&'a Editor),
}

/// Serialized field value, ready to send to the persistence layer
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPayload {
    Empty,
    Stored(Value),
    Mutation(MutationEnvelope),
}

impl FieldPayload {
    /// JSON form; a mutation's document is sent as a JSON string
    pub fn to_json(&self) -> FieldResult<Value> {
        match self {
            FieldPayload::Empty => Ok(json!({ "document": null })),
            FieldPayload::Stored(value) => Ok(value.clone()),
            FieldPayload::Mutation(envelope) => {
                let mut value = serde_json::to_value(envelope)?;
                let document = serde_json::to_string(&envelope.document)?;
                if let Value::Object(fields) = &mut value {
                    fields.insert("document".to_string(), Value::String(document));
                }
                Ok(value)
            }
        }
    }
}

/// Controller for one Content field
pub struct ContentController {
    config: ContentFieldConfig,
    loader: Arc<dyn BlockLoader>,
    blocks: OnceCell<LoadedBlocks>,
}

impl ContentController {
    pub fn new(config: ContentFieldConfig, loader: Arc<dyn BlockLoader>) -> Self {
        Self {
            config,
            loader,
            blocks: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ContentFieldConfig {
        &self.config
    }

    pub fn path(&self) -> &str {
        &self.config.path
    }

    /// Resolve the field's blocks, loading them on first use
    pub async fn blocks(&self) -> FieldResult<&LoadedBlocks> {
        self.blocks.get_or_try_init(|| self.load_blocks()).await
    }

    #[instrument(skip(self), fields(field = %self.config.path))]
    async fn load_blocks(&self) -> FieldResult<LoadedBlocks> {
        let direct: HashSet<&str> = self.config.block_types.iter().map(String::as_str).collect();
        let mut queue: VecDeque<String> = self.config.block_types.iter().cloned().collect();
        let mut seen = HashSet::new();
        let mut loaded: Vec<LoadedBlock> = Vec::new();

        while let Some(block_type) = queue.pop_front() {
            if !seen.insert(block_type.clone()) {
                continue;
            }

            let block = self.loader.load(&block_type).await?;
            debug!(
                block_type = %block_type,
                dependencies = ?block.dependencies,
                "Loaded block"
            );
            queue.extend(block.dependencies.iter().cloned());
            loaded.push(block);
        }

        let mut settings = BTreeMap::new();
        let mut persisted = Vec::new();

        for block in loaded {
            let block_type = block.handler.block_type().to_string();
            let capabilities = block.handler.capabilities();
            let with_chrome = direct.contains(block_type.as_str());

            if capabilities.is_none() {
                if with_chrome {
                    warn!(block_type = %block_type, "Configured block persists no data");
                }
            } else {
                persisted.push(block.handler);
            }

            settings.insert(
                block_type.clone(),
                BlockSettings {
                    options: self.config.block_options.get(&block_type).cloned(),
                    with_chrome,
                    capabilities,
                },
            );
        }

        let registry = BlockRegistry::new(persisted)?;
        info!(
            blocks = settings.len(),
            persisted = registry.len(),
            "Content blocks ready"
        );

        Ok(LoadedBlocks { registry, settings })
    }

    /// Serialize the field's current value
    pub async fn serialize(&self, input: FieldInput<'_>) -> FieldResult<FieldPayload> {
        match input {
            FieldInput::Empty => Ok(FieldPayload::Empty),
            FieldInput::Stored(raw) => Ok(FieldPayload::Stored(serde_json::from_str(raw)?)),
            FieldInput::Editor(editor) => {
                let blocks = self.blocks().await?;
                let serialization = serialize_editor(editor, blocks.registry())?;
                Ok(FieldPayload::Mutation(assemble(serialization)))
            }
        }
    }

    /// Rehydrate a stored value into an editable document
    pub async fn deserialize(&self, stored: Option<&str>) -> FieldResult<Node> {
        let Some(raw) = stored else {
            return Ok(Node::document(Vec::new()));
        };

        let resolved = parse_stored(raw)?;
        let blocks = self.blocks().await?;
        Ok(deserialize(&resolved, blocks.registry())?)
    }
}

/// Parse `{ document, ...records }`, where `document` may itself be JSON text
fn parse_stored(raw: &str) -> FieldResult<ResolvedDocument> {
    let mut fields: Map<String, Value> = serde_json::from_str(raw)?;

    let document = match fields.remove("document") {
        None | Some(Value::Null) => Node::document(Vec::new()),
        Some(Value::String(text)) => serde_json::from_str(&text)?,
        Some(tree) => serde_json::from_value(tree)?,
    };

    Ok(ResolvedDocument {
        document,
        records: fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored_with_string_document() {
        let raw = r#"{
            "document": "{\"kind\":\"document\",\"children\":[]}",
            "cloudinaryImages": [{ "id": "a" }]
        }"#;

        let resolved = parse_stored(raw).unwrap();
        assert_eq!(resolved.document, Node::document(vec![]));
        assert_eq!(resolved.records["cloudinaryImages"], json!([{ "id": "a" }]));
    }

    #[test]
    fn test_parse_stored_null_document() {
        let resolved = parse_stored(r#"{ "document": null }"#).unwrap();
        assert_eq!(resolved.document, Node::document(vec![]));
        assert!(resolved.records.is_empty());
    }

    #[test]
    fn test_parse_stored_rejects_garbage() {
        assert!(matches!(parse_stored("not json"), Err(FieldError::Json(_))));
    }

    #[test]
    fn test_empty_payload_json() {
        assert_eq!(FieldPayload::Empty.to_json().unwrap(), json!({ "document": null }));
    }
}
