use super::{field_controller, read_input, write_output, GlobalOptions};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DeserializeArgs {
    /// Stored value: `{ document, ...records }` with records keyed by path
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub async fn deserialize(args: DeserializeArgs, globals: &GlobalOptions, cwd: &str) -> Result<()> {
    let controller = field_controller(globals, cwd)?;
    let stored = read_input(&args.input)?;

    eprintln!(
        "{} {} from {}",
        "Deserializing".green().bold(),
        args.input.display(),
        controller.path().bright_white()
    );

    let document = controller.deserialize(Some(&stored)).await?;
    write_output(&document, args.out.as_deref())
}
