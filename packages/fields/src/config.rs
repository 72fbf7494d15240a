use crate::blocks::builtin_persisted_types;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Configuration of one Content field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFieldConfig {
    /// Field path on the list item
    pub path: String,

    /// Block types offered directly by the field
    #[serde(default)]
    pub block_types: Vec<String>,

    /// Per-type options handed to the block's views
    #[serde(default)]
    pub block_options: BTreeMap<String, Value>,
}

impl ContentFieldConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_types: Vec::new(),
            block_options: BTreeMap::new(),
        }
    }

    pub fn with_block_types<I, S>(mut self, block_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_types = block_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_block_option(mut self, block_type: impl Into<String>, options: Value) -> Self {
        self.block_options.insert(block_type.into(), options);
        self
    }
}

impl Default for ContentFieldConfig {
    fn default() -> Self {
        Self::new("content").with_block_types(builtin_persisted_types())
    }
}
