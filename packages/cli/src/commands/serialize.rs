use super::{field_controller, read_json, write_output, GlobalOptions};
use anyhow::Result;
use blockpress_core::{Editor, Node};
use blockpress_fields::FieldInput;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SerializeArgs {
    /// Editor document (JSON)
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print the per-path batches instead of the mutation envelope
    #[arg(long)]
    pub raw: bool,
}

pub async fn serialize(args: SerializeArgs, globals: &GlobalOptions, cwd: &str) -> Result<()> {
    let controller = field_controller(globals, cwd)?;
    let document: Node = read_json(&args.input)?;
    let editor = Editor::new(document);

    eprintln!(
        "{} {} into {}",
        "Serializing".green().bold(),
        args.input.display(),
        controller.path().bright_white()
    );

    if args.raw {
        let blocks = controller.blocks().await?;
        let serialization = blockpress_core::serialize_editor(&editor, blocks.registry())?;
        return write_output(&serialization, args.out.as_deref());
    }

    let payload = controller.serialize(FieldInput::Editor(&editor)).await?;
    write_output(&payload.to_json()?, args.out.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn write_document(dir: &std::path::Path) -> PathBuf {
        let input = dir.join("document.json");
        let document = json!({
            "kind": "document",
            "children": [
                { "kind": "block", "type": "cloudinaryImage", "data": { "file": "F", "align": "left" } },
                { "kind": "block", "type": "paragraph", "children": [] }
            ]
        });
        std::fs::write(&input, document.to_string()).unwrap();
        input
    }

    #[tokio::test]
    async fn test_serialize_writes_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let input = write_document(dir.path());
        let out = dir.path().join("out/envelope.json");

        let args = SerializeArgs {
            input,
            out: Some(out.clone()),
            raw: false,
        };
        serialize(args, &GlobalOptions::default(), &cwd).await.unwrap();

        let envelope: Value = serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert!(envelope["document"].is_string());
        assert_eq!(
            envelope["cloudinaryImages"],
            json!({ "disconnectAll": true, "create": [{ "image": "F", "align": "left" }], "connect": [] })
        );
        assert!(envelope.get("relationshipTags").is_none());
    }

    #[tokio::test]
    async fn test_serialize_raw_batches() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let input = write_document(dir.path());
        let out = dir.path().join("raw.json");

        let args = SerializeArgs {
            input,
            out: Some(out.clone()),
            raw: true,
        };
        serialize(args, &GlobalOptions::default(), &cwd).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(
            raw["document"]["children"][0]["data"],
            json!({ "_mutationPaths": ["cloudinaryImages.create[0]"] })
        );
        assert_eq!(raw["relationshipTags"], json!({}));
    }

    #[tokio::test]
    async fn test_serialize_unknown_field() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let input = write_document(dir.path());

        let globals = GlobalOptions {
            config: None,
            field: Some("body".to_string()),
        };
        let args = SerializeArgs {
            input,
            out: None,
            raw: false,
        };
        assert!(serialize(args, &globals, &cwd).await.is_err());
    }
}
