use super::{join_or_create, required};
use blockpress_core::{Block, ContentError, ContentResult, Node, SerializeContext, Serialized};
use serde_json::{json, Value};

/// Alignments accepted by image blocks
pub const ALIGNMENTS: &[&str] = &["left", "center", "right"];

/// Uploaded image, stored in its own `cloudinaryImages` collection
///
/// Authored data: `{ file, align? }`. Persisted records: `{ id, image, align }`
/// plus whatever the storage adapter resolves (e.g. `publicUrl`).
#[derive(Debug, Clone)]
pub struct CloudinaryImageBlock {
    default_align: String,
}

impl Default for CloudinaryImageBlock {
    fn default() -> Self {
        Self {
            default_align: "center".to_string(),
        }
    }
}

impl CloudinaryImageBlock {
    pub fn with_default_align(align: impl Into<String>) -> ContentResult<Self> {
        let align = align.into();
        check_align(&align)?;
        Ok(Self {
            default_align: align,
        })
    }
}

fn check_align(align: &str) -> ContentResult<()> {
    if ALIGNMENTS.contains(&align) {
        Ok(())
    } else {
        Err(ContentError::invalid_data(
            "cloudinaryImage",
            format!("align must be one of {}, got '{}'", ALIGNMENTS.join(", "), align),
        ))
    }
}

impl Block for CloudinaryImageBlock {
    fn block_type(&self) -> &str {
        "cloudinaryImage"
    }

    fn serialize(&self, _ctx: &SerializeContext<'_>, node: &Node) -> ContentResult<Serialized> {
        join_or_create(node, |data| {
            let image = required(self.block_type(), data, "file")?;

            let align = match data.get("align") {
                None | Some(Value::Null) => self.default_align.as_str(),
                Some(Value::String(align)) => align.as_str(),
                Some(other) => {
                    return Err(ContentError::invalid_data(
                        self.block_type(),
                        format!("align must be a string, got {}", other),
                    ))
                }
            };
            check_align(align)?;

            Ok(json!({ "image": image, "align": align }))
        })
    }
}
