use super::{field_controller, GlobalOptions};
use anyhow::Result;
use blockpress_fields::LoadedBlocks;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct BlocksArgs {
    /// Print the resolved blocks as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn blocks(args: BlocksArgs, globals: &GlobalOptions, cwd: &str) -> Result<()> {
    let controller = field_controller(globals, cwd)?;
    let loaded = controller.blocks().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog(loaded))?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Blocks for".bright_blue().bold(),
        controller.path().bright_white()
    );
    println!();

    for block_type in loaded.block_types() {
        let Some(settings) = loaded.settings(block_type) else {
            continue;
        };

        let persisted = loaded
            .registry()
            .get(block_type)
            .map(|registered| format!("→ {}", registered.path()).green())
            .unwrap_or_else(|| "editor only".dimmed());
        let chrome = if settings.with_chrome { "" } else { " (dependency)" };

        println!("  {} {}{}", block_type.bright_white(), persisted, chrome.dimmed());
        if let Some(options) = &settings.options {
            println!("      options: {}", options);
        }
    }

    println!();
    println!(
        "  {} block(s), {} persisted",
        loaded.block_types().len(),
        loaded.registry().len()
    );

    Ok(())
}

fn catalog(loaded: &LoadedBlocks) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = loaded
        .block_types()
        .into_iter()
        .filter_map(|block_type| {
            let settings = loaded.settings(block_type)?;
            Some(serde_json::json!({
                "type": block_type,
                "path": loaded.registry().get(block_type).map(|registered| registered.path()),
                "withChrome": settings.with_chrome,
                "serialize": settings.capabilities.serialize,
                "deserialize": settings.capabilities.deserialize,
                "options": settings.options,
            }))
        })
        .collect();

    serde_json::Value::Array(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpress_fields::{ContentController, ContentFieldConfig, StaticBlockLoader};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_catalog_marks_dependencies() {
        let controller = ContentController::new(
            ContentFieldConfig::new("body").with_block_types(["cloudinaryImage"]),
            Arc::new(StaticBlockLoader::builtin()),
        );
        let loaded = controller.blocks().await.unwrap();

        assert_eq!(
            catalog(loaded),
            json!([
                { "type": "caption", "path": null, "withChrome": false, "serialize": false, "deserialize": false, "options": null },
                { "type": "cloudinaryImage", "path": "cloudinaryImages", "withChrome": true, "serialize": true, "deserialize": true, "options": null },
                { "type": "image", "path": null, "withChrome": false, "serialize": false, "deserialize": false, "options": null }
            ])
        );
    }

    #[tokio::test]
    async fn test_blocks_with_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        blocks(BlocksArgs { json: false }, &GlobalOptions::default(), &cwd)
            .await
            .unwrap();
    }
}
