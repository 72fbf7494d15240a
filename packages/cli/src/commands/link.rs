use super::{read_json, write_output};
use anyhow::{Context, Result};
use blockpress_core::{MutationBatches, Node};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Pruned document, or the mutation envelope that carries it
    pub pruned: PathBuf,

    /// Records produced by the persistence layer, keyed by path
    pub results: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn link(args: LinkArgs) -> Result<()> {
    let pruned = pruned_document(read_json(&args.pruned)?)?;
    let results: MutationBatches = read_json(&args.results)?;

    eprintln!(
        "{} {} against {} record(s)",
        "Linking".green().bold(),
        args.pruned.display(),
        results.len()
    );

    let linked = blockpress_core::link(&pruned, &results)?;
    write_output(&linked, args.out.as_deref())
}

/// Accepts a bare tree or an envelope whose `document` is a tree or JSON text
fn pruned_document(value: Value) -> Result<Node> {
    let is_tree = value.get("kind").is_some() || value.get("object").is_some();

    match value.get("document") {
        Some(Value::String(text)) if !is_tree => {
            serde_json::from_str(text).context("Envelope document is not a valid tree")
        }
        Some(tree) if !is_tree => Ok(serde_json::from_value(tree.clone())?),
        _ => Ok(serde_json::from_value(value)?),
    }
}
