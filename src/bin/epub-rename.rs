use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use epub_tools::{Platform, RenameOptions, Reporter, Template, expand_path, logging, rename_ebook};
use tracing::error;

/// Rename *.epub files after their title and author metadata.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Naming template: 't' for '<title>', 'ta' for '<title> - <author>',
    /// 'at' for '<author> - <title>'
    #[arg(short, long, value_enum, default_value_t = Template::Title)]
    name: Template,
    /// File and/or directory paths. Only *.epub files are renamed
    #[arg(short, long, num_args = 0..)]
    paths: Vec<PathBuf>,
    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
    /// Show what would be renamed without touching any file
    #[arg(long)]
    dry_run: bool,
    /// Paths may also be given without -p
    #[arg(hide = true)]
    rest: Vec<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    logging::init();
    let args = Args::parse();

    let paths = if !args.paths.is_empty() {
        args.paths
    } else if !args.rest.is_empty() {
        args.rest
    } else {
        vec![std::env::current_dir()?]
    };
    let options = RenameOptions {
        template: args.name,
        dry_run: args.dry_run,
    };
    let reporter = Reporter::new(args.quiet);
    let platform = Platform::current();

    let mut failed = false;
    for path in &paths {
        let books = match expand_path(path) {
            Ok(books) => books,
            Err(e) => {
                error!("{e}, skipping");
                failed = true;
                continue;
            }
        };
        for book in books {
            if let Err(e) = rename_ebook(&book, &options, platform, &reporter) {
                error!("{e}");
                failed = true;
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
