use blockpress_core::{Block, Capabilities, ContentResult, Node, SerializeContext, Serialized};

/// Block that only exists in the editor (e.g. the image and caption parts of
/// an image block). It persists nothing and is left out of registries.
#[derive(Debug, Clone)]
pub struct EditorOnlyBlock {
    block_type: String,
}

impl EditorOnlyBlock {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
        }
    }
}

impl Block for EditorOnlyBlock {
    fn block_type(&self) -> &str {
        &self.block_type
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    fn serialize(&self, _ctx: &SerializeContext<'_>, _node: &Node) -> ContentResult<Serialized> {
        Ok(Serialized::unhandled())
    }
}
