//! CSV reader for the reference table of contents

use super::types::{
    Result, TableOfContents, TocEntry, TocError, COLUMN_CHAPTER, COLUMN_PAGE, COLUMN_PART,
    COLUMN_TITLE,
};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
}

fn required_column(headers: &StringRecord, name: &'static str) -> Result<usize> {
    column_index(headers, name).ok_or(TocError::MissingColumn(name))
}

impl TableOfContents {
    /// Load the TOC from a CSV file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TocError::NotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let toc = Self::from_reader(file)?;
        debug!(path = %path.display(), entries = toc.len(), "loaded table of contents");
        Ok(toc)
    }

    /// Parse a TOC from any CSV source
    ///
    /// Column order is free and unknown columns are ignored. Rows whose
    /// part, chapter and title cells are all blank are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let part_col = required_column(&headers, COLUMN_PART)?;
        let chapter_col = required_column(&headers, COLUMN_CHAPTER)?;
        let title_col = required_column(&headers, COLUMN_TITLE)?;
        let page_col = column_index(&headers, COLUMN_PAGE);

        let mut entries = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

            let part = cell(part_col);
            let chapter = cell(chapter_col);
            let title = cell(title_col);
            if part.is_empty() && chapter.is_empty() && title.is_empty() {
                continue;
            }
            if part.is_empty() || chapter.is_empty() {
                warn!(row = row + 2, title = %title, "TOC row without part or chapter");
            }

            let page = page_col.map(cell).filter(|p| !p.is_empty());
            entries.push(TocEntry {
                part,
                chapter,
                title,
                page,
            });
        }

        Ok(Self::new(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "Part,Chapter,Title,Page\n\
        I,I, Of Devotion ,3\n\
        I,II,Of Prayer,\n\
        \n\
        II,I,\"Of the Mass, and how to hear it\",40\n";

    #[test]
    fn test_from_reader() {
        let toc = TableOfContents::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(toc.len(), 3);
        let first = &toc.entries()[0];
        assert_eq!(first.title, "Of Devotion");
        assert_eq!(first.page.as_deref(), Some("3"));
        assert_eq!(toc.entries()[1].page, None);
        assert_eq!(toc.entries()[2].title, "Of the Mass, and how to hear it");
        assert_eq!(toc.part_keys(), vec!["I", "II"]);
    }

    #[test]
    fn test_column_order_is_free() {
        let csv = "Title,Page,Chapter,Part,Notes\nOf Alms,9,IV,III,x\n";
        let toc = TableOfContents::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(toc.entries()[0], {
            let mut e = TocEntry::new("III", "IV", "Of Alms");
            e.page = Some("9".to_string());
            e
        });
    }

    #[test]
    fn test_missing_column() {
        let csv = "Part,Title\nI,Of Devotion\n";
        let result = TableOfContents::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(TocError::MissingColumn("Chapter"))));
    }

    #[test]
    fn test_load_file_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toc.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all("\u{feff}Part,Chapter,Title,Page\nI,I,Of Devotion,1\n".as_bytes())
            .unwrap();
        drop(f);

        let toc = TableOfContents::load(&path).unwrap();
        assert_eq!(toc.len(), 1);
    }

    #[test]
    fn test_load_missing() {
        let result = TableOfContents::load(Path::new("/nonexistent/toc.csv"));
        assert!(matches!(result, Err(TocError::NotFound(_))));
    }
}
