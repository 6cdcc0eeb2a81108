//! In-place title and author edits.

use std::path::Path;

use crate::book::{Book, DcElement};
use crate::error::{Error, Result};
use crate::is_epub;
use crate::report::Reporter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl MetadataUpdate {
    /// True when neither field carries a non-blank value.
    pub fn is_empty(&self) -> bool {
        self.changes().next().is_none()
    }

    /// Blank values count as not provided.
    fn changes(&self) -> impl Iterator<Item = (DcElement, &str)> {
        [
            (DcElement::Title, self.title.as_deref()),
            (DcElement::Creator, self.author.as_deref()),
        ]
        .into_iter()
        .filter_map(|(element, value)| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(|v| (element, v))
        })
    }
}

/// Checks that `path` is an existing file with the epub suffix.
pub fn validate_target(path: &Path) -> Result<()> {
    if path.is_file() && is_epub(path) {
        Ok(())
    } else {
        Err(Error::NotAnEpub(path.display().to_string()))
    }
}

pub fn update_metadata(path: &Path, update: &MetadataUpdate, reporter: &Reporter) -> Result<()> {
    if update.is_empty() {
        return Err(Error::NothingToUpdate);
    }
    validate_target(path)?;
    let mut book = Book::open(path)?;

    for (element, value) in update.changes() {
        let label = match element {
            DcElement::Title => "title",
            DcElement::Creator => "author",
        };
        let original = book.metadata(element).unwrap_or("None").to_string();
        book.set_unique_metadata(element, value);
        reporter.info(format!(
            "Original {label}: {original}\nUpdated {label}: {value}"
        ));
    }

    book.save()?;
    reporter.info(format!("{} updated successfully", path.display()));
    Ok(())
}
