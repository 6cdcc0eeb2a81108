//! Filename generation from book metadata.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;

use crate::EBOOK_SUFFIX;
use crate::error::Error;

static WINDOWS_ILLEGAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());
static UNIX_ILLEGAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[:/]").unwrap());

/// Naming template for renamed books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Template {
    /// `<title>`
    #[default]
    #[value(name = "t")]
    Title,
    /// `<title> - <author>`
    #[value(name = "ta")]
    TitleAuthor,
    /// `<author> - <title>`
    #[value(name = "at")]
    AuthorTitle,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Title => "t",
            Template::TitleAuthor => "ta",
            Template::AuthorTitle => "at",
        }
    }

    /// Fills the template without any cleaning.
    pub fn apply(&self, title: &str, author: &str) -> String {
        match self {
            Template::Title => title.to_string(),
            Template::TitleAuthor => format!("{title} - {author}"),
            Template::AuthorTitle => format!("{author} - {title}"),
        }
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t" => Ok(Template::Title),
            "ta" => Ok(Template::TitleAuthor),
            "at" => Ok(Template::AuthorTitle),
            other => Err(Error::InvalidTemplate(other.to_string())),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filesystem family whose filename rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    fn illegal_chars(&self) -> &'static Regex {
        match self {
            Platform::Windows => &WINDOWS_ILLEGAL,
            Platform::Unix => &UNIX_ILLEGAL,
        }
    }
}

/// Strips characters the platform does not allow in a filename.
pub fn clean_filename(name: &str, platform: Platform) -> String {
    platform.illegal_chars().replace_all(name, "").into_owned()
}

/// Builds the `.epub` filename for a book.
///
/// Colons become `" -"` before cleaning, so `Title: Subtitle` yields
/// `Title - Subtitle.epub`.
/// Returns `None` when nothing usable remains of the name.
pub fn generate_filename(
    template: Template,
    title: &str,
    author: &str,
    platform: Platform,
) -> Option<String> {
    let name = template.apply(title, author).replace(':', " -");
    let stem = clean_filename(&name, platform);
    if stem.trim().is_empty() {
        return None;
    }
    Some(format!("{stem}{EBOOK_SUFFIX}"))
}
