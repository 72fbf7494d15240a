//! Block registry: maps block type tags to handlers.
//!
//! Construction validates the whole set up front, so dispatch during a walk
//! can never be ambiguous.

use crate::block::Block;
use crate::errors::{ContentError, ContentResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A validated handler together with its collection path
#[derive(Debug, Clone)]
pub struct RegisteredBlock {
    handler: Arc<dyn Block>,
    path: String,
}

impl RegisteredBlock {
    pub fn handler(&self) -> &dyn Block {
        self.handler.as_ref()
    }

    pub fn block_type(&self) -> &str {
        self.handler.block_type()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Registry of block handlers keyed by type tag
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: BTreeMap<String, RegisteredBlock>,
}

impl BlockRegistry {
    /// Build a registry, rejecting duplicate types and incomplete handlers
    pub fn new(blocks: impl IntoIterator<Item = Arc<dyn Block>>) -> ContentResult<Self> {
        let mut registry = Self::default();
        for block in blocks {
            registry.register(block)?;
        }
        Ok(registry)
    }

    fn register(&mut self, handler: Arc<dyn Block>) -> ContentResult<()> {
        let block_type = handler.block_type().to_string();

        if self.blocks.contains_key(&block_type) {
            return Err(ContentError::RegistrationConflict { block_type });
        }

        let capabilities = handler.capabilities();
        if !capabilities.serialize {
            return Err(ContentError::MalformedHandler {
                block_type,
                capability: "serialize",
            });
        }
        if !capabilities.deserialize {
            return Err(ContentError::MalformedHandler {
                block_type,
                capability: "deserialize",
            });
        }

        let path = handler.path();
        tracing::debug!(block_type = %block_type, path = %path, "Registering block");
        self.blocks.insert(block_type, RegisteredBlock { handler, path });
        Ok(())
    }

    /// Look up a handler by type tag
    pub fn get(&self, block_type: &str) -> Option<&RegisteredBlock> {
        self.blocks.get(block_type)
    }

    /// Handler for a node's type, if it is registered
    pub fn for_node(&self, node: &crate::Node) -> Option<&RegisteredBlock> {
        node.block_type().and_then(|block_type| self.get(block_type))
    }

    /// Registered blocks, sorted by type tag
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredBlock> {
        self.blocks.values()
    }

    pub fn block_types(&self) -> Vec<&str> {
        self.blocks.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}
