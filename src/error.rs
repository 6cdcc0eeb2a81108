use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to open '{}' as epub: {source}", path.display())]
    OpenEpub {
        path: PathBuf,
        source: epub::doc::DocError,
    },

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid file: {0}")]
    NotAnEpub(String),

    #[error("Invalid path: '{0}'")]
    InvalidPath(String),

    #[error("Invalid template option '{0}'. Please use 't', 'ta', or 'at'.")]
    InvalidTemplate(String),

    #[error("The \"{0}\" element was not found")]
    MissingElement(String),

    #[error("The \"{0}\" file was not found in the archive")]
    MissingEntry(String),

    #[error("Title and/or author must be provided")]
    NothingToUpdate,

    #[error("Unable to rename '{}' to '{}': {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
