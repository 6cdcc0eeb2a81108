//! Rename EPUB files after their metadata, and edit that metadata in place.
//!
//! The two command-line tools, `epub-rename` and `epub-update-metadata`, are
//! thin wrappers over [`rename`] and [`update`].

use std::path::Path;

pub mod archive;
pub mod book;
pub mod error;
pub mod filename;
pub mod logging;
pub mod opf;
pub mod rename;
pub mod report;
pub mod update;

pub use book::{Book, DcElement};
pub use error::{Error, Result};
pub use filename::{Platform, Template, clean_filename, generate_filename};
pub use rename::{RenameOptions, RenameOutcome, expand_path, rename_ebook};
pub use report::Reporter;
pub use update::{MetadataUpdate, update_metadata};

pub const EBOOK_SUFFIX: &str = ".epub";

/// True when the final extension is exactly `epub`.
pub fn is_epub(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext == &EBOOK_SUFFIX[1..])
}
