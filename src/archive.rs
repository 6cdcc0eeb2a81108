//! Reading and rewriting entries of the EPUB zip container.

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::opf;

pub const CONTAINER_PATH: &str = "META-INF/container.xml";

pub fn open(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}

/// Reads a UTF-8 entry from the archive.
pub fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = archive.by_name(name)?;
    let mut content = Vec::new();
    entry.read_to_end(&mut content)?;
    Ok(String::from_utf8(content)?)
}

/// Locates the package document through `META-INF/container.xml`.
pub fn package_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let container = read_entry(archive, CONTAINER_PATH)?;
    opf::rootfile_path(&container)
}

/// Replaces the contents of one entry, leaving every other entry byte-for-byte intact.
///
/// The new archive is assembled in a temporary file next to `path` and moved
/// over it once complete.
pub fn replace_entry(path: &Path, name: &str, contents: &[u8]) -> Result<()> {
    let mut archive = open(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    let mut replaced = false;
    {
        let mut writer = ZipWriter::new(tmp.as_file_mut());
        let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            if entry.name() == name {
                let entry_name = entry.name().to_string();
                drop(entry);
                debug!("rewriting entry {entry_name}");
                writer.start_file(entry_name, options)?;
                writer.write_all(contents)?;
                replaced = true;
            } else {
                writer.raw_copy_file(entry)?;
            }
        }
        writer.finish()?;
    }
    drop(archive);
    if !replaced {
        return Err(Error::MissingEntry(name.to_string()));
    }
    fs::set_permissions(tmp.path(), fs::metadata(path)?.permissions())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn build(entries: &[(&str, &str, CompressionMethod)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body, method) in entries {
            let options = FileOptions::<()>::default().compression_method(*method);
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_replace_entry_keeps_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        fs::write(
            &path,
            build(&[
                ("mimetype", "application/epub+zip", CompressionMethod::Stored),
                ("OEBPS/content.opf", "old", CompressionMethod::Deflated),
                ("OEBPS/chapter.xhtml", "<p>hi</p>", CompressionMethod::Deflated),
            ]),
        )
        .unwrap();

        replace_entry(&path, "OEBPS/content.opf", b"new").unwrap();

        let mut archive = open(&path).unwrap();
        assert_eq!(archive.len(), 3);
        {
            let first = archive.by_index(0).unwrap();
            assert_eq!(first.name(), "mimetype");
            assert_eq!(first.compression(), CompressionMethod::Stored);
        }
        assert_eq!(read_entry(&mut archive, "OEBPS/content.opf").unwrap(), "new");
        assert_eq!(
            read_entry(&mut archive, "OEBPS/chapter.xhtml").unwrap(),
            "<p>hi</p>"
        );
    }

    #[test]
    fn test_package_path() {
        let container = r#"<container><rootfiles><rootfile full-path="content.opf"/></rootfiles></container>"#;
        let data = build(&[(CONTAINER_PATH, container, CompressionMethod::Deflated)]);
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(package_path(&mut archive).unwrap(), "content.opf");
    }

    #[test]
    fn test_replace_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        fs::write(&path, build(&[("a.txt", "a", CompressionMethod::Stored)])).unwrap();

        let result = replace_entry(&path, "b.txt", b"b");
        assert!(matches!(result, Err(Error::MissingEntry(name)) if name == "b.txt"));
        assert_eq!(read_entry(&mut open(&path).unwrap(), "a.txt").unwrap(), "a");
    }
}
