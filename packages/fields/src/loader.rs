//! # Block Loading
//!
//! Block handlers are resolved asynchronously, one type at a time, the first
//! time a field needs them. The controller awaits every handler before it
//! serializes, so the synchronous core never sees a half-loaded registry.

use crate::blocks::builtin_blocks;
use crate::errors::{FieldError, FieldResult};
use blockpress_core::Block;
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A resolved block handler and the block types it needs alongside it
#[derive(Debug, Clone)]
pub struct LoadedBlock {
    pub handler: Arc<dyn Block>,
    pub dependencies: Vec<String>,
}

impl LoadedBlock {
    pub fn new(handler: Arc<dyn Block>) -> Self {
        Self {
            handler,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

/// Source of block handlers
pub trait BlockLoader: Send + Sync {
    fn load<'a>(&'a self, block_type: &'a str) -> BoxFuture<'a, FieldResult<LoadedBlock>>;
}

/// In-memory block catalog
#[derive(Debug, Clone, Default)]
pub struct StaticBlockLoader {
    blocks: BTreeMap<String, LoadedBlock>,
}

impl StaticBlockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the blocks shipped with this crate
    pub fn builtin() -> Self {
        builtin_blocks().into_iter().fold(Self::new(), Self::with_block)
    }

    /// Add a block; a later block with the same type replaces the earlier one
    pub fn with_block(mut self, block: LoadedBlock) -> Self {
        self.blocks
            .insert(block.handler.block_type().to_string(), block);
        self
    }

    pub fn block_types(&self) -> Vec<&str> {
        self.blocks.keys().map(String::as_str).collect()
    }
}

impl BlockLoader for StaticBlockLoader {
    fn load<'a>(&'a self, block_type: &'a str) -> BoxFuture<'a, FieldResult<LoadedBlock>> {
        let result = self
            .blocks
            .get(block_type)
            .cloned()
            .ok_or_else(|| FieldError::UnknownBlock(block_type.to_string()));

        future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_catalog() {
        let loader = StaticBlockLoader::builtin();
        assert_eq!(
            loader.block_types(),
            vec!["caption", "cloudinaryImage", "image", "relationshipTag", "relationshipUser"]
        );

        let image = loader.load("cloudinaryImage").await.unwrap();
        assert_eq!(image.dependencies, vec!["image", "caption"]);

        assert!(matches!(
            loader.load("video").await,
            Err(FieldError::UnknownBlock(ref block_type)) if block_type == "video"
        ));
    }
}
