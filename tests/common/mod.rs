#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use tempfile::{Builder, TempDir};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const OPF_PATH: &str = "OEBPS/content.opf";

const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

const NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="urn:uuid:0b4c3d3e-7f60-4a41-9d0a-1d2f5c6e7a8b"/>
  </head>
  <docTitle><text>Fixture</text></docTitle>
  <navMap>
    <navPoint id="np1" playOrder="1">
      <navLabel><text>Chapter 1</text></navLabel>
      <content src="chapter1.xhtml"/>
    </navPoint>
  </navMap>
</ncx>
"#;

const CHAPTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head><title>Chapter 1</title></head>
  <body><p>It was a dark and stormy night.</p></body>
</html>
"#;

pub fn tempdir() -> anyhow::Result<TempDir> {
    Ok(Builder::new().prefix("epub-tools-test-").tempdir()?)
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn opf(title: Option<&str>, creator: Option<&str>) -> String {
    let title = title
        .map(|t| format!("    <dc:title id=\"title\">{}</dc:title>\n", escape(t)))
        .unwrap_or_default();
    let creator = creator
        .map(|c| {
            format!(
                "    <dc:creator id=\"creator\">{}</dc:creator>\n    <meta refines=\"#creator\" property=\"role\" scheme=\"marc:relators\">aut</meta>\n",
                escape(c)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:identifier id="BookId">urn:uuid:0b4c3d3e-7f60-4a41-9d0a-1d2f5c6e7a8b</dc:identifier>
{title}{creator}    <dc:language>en</dc:language>
  </metadata>
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="chapter1" href="chapter1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="chapter1"/>
  </spine>
</package>
"#
    )
}

/// Writes a minimal but complete EPUB 2 book.
pub fn write_epub(path: &Path, title: Option<&str>, creator: Option<&str>) -> anyhow::Result<()> {
    let file = fs::File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let stored = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);
    let deflated = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored)?;
    zip.write_all(b"application/epub+zip")?;

    let package = opf(title, creator);
    let entries = [
        ("META-INF/container.xml", CONTAINER),
        (OPF_PATH, package.as_str()),
        ("OEBPS/toc.ncx", NCX),
        ("OEBPS/chapter1.xhtml", CHAPTER),
    ];
    for (name, body) in entries {
        zip.start_file(name, deflated)?;
        zip.write_all(body.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

pub fn read_entry(path: &Path, name: &str) -> anyhow::Result<String> {
    let mut archive = ZipArchive::new(fs::File::open(path)?)?;
    let mut entry = archive.by_name(name)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

pub fn entry_names(path: &Path) -> anyhow::Result<Vec<String>> {
    let archive = ZipArchive::new(fs::File::open(path)?)?;
    Ok(archive.file_names().map(str::to_string).collect())
}

pub fn file_names(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
