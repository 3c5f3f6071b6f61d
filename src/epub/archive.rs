//! Zip access to an EPUB file

use super::package::{parse_container, Package};
use super::types::{EpubError, Result, CONTAINER_PATH};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// An opened EPUB archive
pub struct EpubArchive<R: Read + Seek = BufReader<File>> {
    zip: ZipArchive<R>,
}

impl EpubArchive<BufReader<File>> {
    /// Open an EPUB from disk
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EpubError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let archive = Self::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), entries = archive.len(), "opened EPUB");
        Ok(archive)
    }
}

impl<R: Read + Seek> EpubArchive<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            zip: ZipArchive::new(reader)?,
        })
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.len() == 0
    }

    /// Entry names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.zip.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zip.index_for_name(name).is_some()
    }

    /// Read an entry as text, replacing invalid UTF-8
    pub fn read_text(&mut self, name: &str) -> Result<String> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(EpubError::MissingEntry(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Path of the OPF package declared by the container
    pub fn rootfile(&mut self) -> Result<String> {
        let xml = self.read_text(CONTAINER_PATH)?;
        parse_container(&xml)
    }

    /// Parse the OPF package
    pub fn package(&mut self) -> Result<Package> {
        let opf_path = self.rootfile()?;
        let xml = self.read_text(&opf_path)?;
        Package::parse(&opf_path, &xml)
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! In-memory EPUB builder for tests

    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    pub fn build(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, body) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_open_missing() {
        let result = EpubArchive::open(Path::new("/nonexistent/book.epub"));
        assert!(matches!(result, Err(EpubError::NotFound(_))));
    }

    #[test]
    fn test_not_a_zip() {
        let result = EpubArchive::from_reader(Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(EpubError::Zip(_))));
    }

    #[test]
    fn test_read_entries() {
        let bytes = fixture::build(&[
            ("mimetype", "application/epub+zip"),
            ("OEBPS/b.xhtml", "<p>b</p>"),
            ("OEBPS/a.xhtml", "<p>a</p>"),
        ]);
        let mut archive = EpubArchive::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);
        assert_eq!(
            archive.names(),
            vec!["OEBPS/a.xhtml", "OEBPS/b.xhtml", "mimetype"]
        );
        assert!(archive.contains("OEBPS/a.xhtml"));
        assert_eq!(archive.read_text("OEBPS/b.xhtml").unwrap(), "<p>b</p>");
        assert!(matches!(
            archive.read_text("OEBPS/zzz.xhtml"),
            Err(EpubError::MissingEntry(_))
        ));
    }

    #[test]
    fn test_rootfile() {
        let bytes = fixture::build(&[("META-INF/container.xml", fixture::CONTAINER)]);
        let mut archive = EpubArchive::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.rootfile().unwrap(), "OEBPS/content.opf");
    }
}
