mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    blocks, deserialize, init, link, serialize, BlocksArgs, DeserializeArgs, GlobalOptions, InitArgs, LinkArgs,
    SerializeArgs,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Blockpress CLI - Serialize structured Content documents for persistence
#[derive(Parser, Debug)]
#[command(name = "blockpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to blockpress.config.json in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Content field to use (defaults to the first configured field)
    #[arg(short, long, global = true)]
    field: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a blockpress.config.json
    Init(InitArgs),

    /// Turn an editor document into a mutation envelope
    Serialize(SerializeArgs),

    /// Replace mutation paths with the ids the persistence layer returned
    Link(LinkArgs),

    /// Rehydrate a stored document from its records
    Deserialize(DeserializeArgs),

    /// List the blocks resolved for a field
    Blocks(BlocksArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let globals = GlobalOptions {
        config: cli.config,
        field: cli.field,
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Serialize(args) => serialize(args, &globals, &cwd).await,
        Command::Link(args) => link(args),
        Command::Deserialize(args) => deserialize(args, &globals, &cwd).await,
        Command::Blocks(args) => blocks(args, &globals, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
