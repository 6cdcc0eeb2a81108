use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use epub_tools::{MetadataUpdate, Reporter, logging, update_metadata};

/// Update the title and/or author of an *.epub file in place.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Book title to be updated to
    #[arg(short, long)]
    title: Option<String>,
    /// Book author to be updated to
    #[arg(short, long)]
    author: Option<String>,
    /// Path of the *.epub file
    #[arg(short, long)]
    path: Option<PathBuf>,
    /// Suppress info output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let Some(path) = args.path else {
        bail!("Path must be provided");
    };
    let update = MetadataUpdate {
        title: args.title,
        author: args.author,
    };
    update_metadata(&path, &update, &Reporter::new(args.quiet))
        .with_context(|| format!("Unable to update {}", path.display()))?;
    Ok(())
}
