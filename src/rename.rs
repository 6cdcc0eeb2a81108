//! Renaming books after their title and author.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::book::Book;
use crate::error::{Error, Result};
use crate::filename::{Platform, Template, generate_filename};
use crate::is_epub;
use crate::report::Reporter;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenameOptions {
    pub template: Template,
    pub dry_run: bool,
}

/// What happened to a single book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed(PathBuf),
    WouldRename(PathBuf),
    /// The file already carries the generated name.
    Unchanged,
    /// Another file already has the generated name.
    TargetExists(PathBuf),
    MissingTitle,
    MissingAuthor,
    /// Nothing was left of the name after cleaning.
    EmptyName,
}

/// Resolves a command-line path into the books it names.
///
/// A directory contributes the files directly inside it with the epub suffix,
/// sorted by name.
pub fn expand_path(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() && is_epub(path) {
        return Ok(vec![path.to_path_buf()]);
    }
    if path.is_dir() {
        let mut books = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_file() && is_epub(&entry_path) {
                books.push(entry_path);
            }
        }
        books.sort();
        return Ok(books);
    }
    Err(Error::InvalidPath(path.display().to_string()))
}

pub fn rename_ebook(
    path: &Path,
    options: &RenameOptions,
    platform: Platform,
    reporter: &Reporter,
) -> Result<RenameOutcome> {
    reporter.info(format!("Opening file '{}'...", path.display()));
    let book = Book::open(path)?;

    let Some(title) = book.title() else {
        reporter.info(format!(
            "Could not find title metadata for '{}', skipping",
            path.display()
        ));
        return Ok(RenameOutcome::MissingTitle);
    };
    let Some(author) = book.author() else {
        reporter.info(format!(
            "Could not find author metadata for '{}', skipping",
            path.display()
        ));
        return Ok(RenameOutcome::MissingAuthor);
    };
    reporter.info(format!("Title: {title} | Author: {author}"));

    let Some(name) = generate_filename(options.template, title, author, platform) else {
        warn!(
            "Generated name for '{}' is empty after cleaning, skipping",
            path.display()
        );
        return Ok(RenameOutcome::EmptyName);
    };
    let target = match path.parent() {
        Some(parent) => parent.join(&name),
        None => PathBuf::from(&name),
    };
    reporter.info(format!("File will be renamed '{name}'"));

    if target == path {
        if options.dry_run {
            warn!("DRY RUN: '{}' already exists", target.display());
        } else {
            warn!("'{}' already exists, skipping", target.display());
        }
        return Ok(RenameOutcome::Unchanged);
    }

    if target.exists() {
        warn!(
            "'{}' is already taken by another file, not renaming '{}'",
            target.display(),
            path.display()
        );
        return Ok(RenameOutcome::TargetExists(target));
    }

    if options.dry_run {
        reporter.always(format!(
            "DRY RUN: '{}' would have been renamed '{}'",
            path.display(),
            target.display()
        ));
        return Ok(RenameOutcome::WouldRename(target));
    }

    fs::rename(path, &target).map_err(|source| Error::Rename {
        from: path.to_path_buf(),
        to: target.clone(),
        source,
    })?;
    reporter.info(format!("'{}' renamed successfully", target.display()));
    Ok(RenameOutcome::Renamed(target))
}
