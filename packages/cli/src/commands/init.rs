use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use blockpress_fields::{builtin_persisted_types, ContentFieldConfig};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path of the Content field
    #[arg(short, long, default_value = "content")]
    pub path: String,

    /// Block types to enable (defaults to every built-in persisted block)
    #[arg(short, long = "block", value_name = "TYPE")]
    pub blocks: Vec<String>,

    /// Force overwrite existing config
    #[arg(long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Blockpress config...".bright_blue().bold());

    let block_types = if args.blocks.is_empty() {
        builtin_persisted_types()
    } else {
        args.blocks
    };
    let field = ContentFieldConfig::new(args.path).with_block_types(block_types);

    let config = Config {
        fields: vec![field],
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✨ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to choose your blocks", DEFAULT_CONFIG_NAME.bright_white());
    println!("  2. Run {} to check them", "blockpress blocks".bright_cyan());

    Ok(())
}
