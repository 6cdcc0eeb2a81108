//! Reading and editing the metadata of a single EPUB file.

use std::fs;
use std::path::{Path, PathBuf};

use epub::doc::EpubDoc;
use tracing::debug;

use crate::archive;
use crate::error::{Error, Result};
use crate::opf;
pub use crate::opf::DcElement;

/// An EPUB file with its title and author loaded.
///
/// Edits made with [`Book::set_unique_metadata`] are kept in memory until
/// [`Book::save`] or [`Book::write_to`] writes them into the package document.
#[derive(Debug, Clone)]
pub struct Book {
    path: PathBuf,
    title: Option<String>,
    creator: Option<String>,
    edits: Vec<(DcElement, String)>,
}

impl Book {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let doc = EpubDoc::new(path).map_err(|source| Error::OpenEpub {
            path: path.to_path_buf(),
            source,
        })?;
        let title = doc.mdata("title").and_then(|item| non_empty(&item.value));
        let creator = doc.mdata("creator").and_then(|item| non_empty(&item.value));
        debug!(?title, ?creator, "read metadata from {}", path.display());
        Ok(Book {
            path: path.to_path_buf(),
            title,
            creator,
            edits: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First value of a DC element, if present and not blank.
    pub fn metadata(&self, element: DcElement) -> Option<&str> {
        match element {
            DcElement::Title => self.title.as_deref(),
            DcElement::Creator => self.creator.as_deref(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata(DcElement::Title)
    }

    pub fn author(&self) -> Option<&str> {
        self.metadata(DcElement::Creator)
    }

    /// Replaces all values of `element` with the single `value`.
    pub fn set_unique_metadata(&mut self, element: DcElement, value: impl Into<String>) {
        let value = value.into();
        match element {
            DcElement::Title => self.title = non_empty(&value),
            DcElement::Creator => self.creator = non_empty(&value),
        }
        self.edits.retain(|(e, _)| *e != element);
        self.edits.push((element, value));
    }

    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Writes pending edits back into the file the book was opened from.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone();
        self.write_to(&path)?;
        self.edits.clear();
        Ok(())
    }

    /// Writes the book, with pending edits applied, to `target`.
    pub fn write_to(&self, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref();
        if target != self.path {
            fs::copy(&self.path, target)?;
        }
        if self.edits.is_empty() {
            return Ok(());
        }

        let mut zip = archive::open(&self.path)?;
        let opf_path = archive::package_path(&mut zip)?;
        let package = archive::read_entry(&mut zip, &opf_path)?;
        drop(zip);

        let updated = opf::set_unique_metadata(&package, &self.edits)?;
        debug!("writing {} to {}", opf_path, target.display());
        archive::replace_entry(target, &opf_path, updated.as_bytes())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
