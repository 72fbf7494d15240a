pub mod blocks;
pub mod deserialize;
pub mod init;
pub mod link;
pub mod serialize;

pub use blocks::{blocks, BlocksArgs};
pub use deserialize::{deserialize, DeserializeArgs};
pub use init::{init, InitArgs};
pub use link::{link, LinkArgs};
pub use serialize::{serialize, SerializeArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use blockpress_fields::{ContentController, StaticBlockLoader};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit config file
    pub config: Option<PathBuf>,

    /// Content field to operate on
    pub field: Option<String>,
}

/// Controller for the selected field, backed by the built-in blocks
pub(crate) fn field_controller(globals: &GlobalOptions, cwd: &str) -> Result<ContentController> {
    let config = Config::load(cwd, globals.config.as_deref())?;
    let field = config.field(globals.field.as_deref())?.clone();

    tracing::debug!(field = %field.path, blocks = ?field.block_types, "Using Content field");

    Ok(ContentController::new(
        field,
        Arc::new(StaticBlockLoader::builtin()),
    ))
}

pub(crate) fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_input(path)?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Pretty-print to a file, or to stdout when no file is given
pub(crate) fn write_output<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            eprintln!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
