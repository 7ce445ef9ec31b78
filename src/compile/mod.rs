/// Document assembly module
///
/// The selection screens hand over an ordered list of pages; a
/// `DocumentWriter` turns it into one paginated file. Writers isolate
/// failures per page: an image that cannot be loaded becomes a note on
/// its page and the rest of the document is still written.

pub mod docx;
pub mod reveal;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::data::{ImageEntry, Page};

pub use self::docx::DocxWriter;

/// Number entries by their position (1-based)
pub fn paginate(entries: Vec<ImageEntry>) -> Vec<Page> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| Page {
            number: i + 1,
            path: entry.path,
            captured_at: entry.timestamp,
        })
        .collect()
}

/// A page whose image could not be embedded
#[derive(Debug, Clone, PartialEq)]
pub struct PageFailure {
    pub number: usize,
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of writing a document
#[derive(Debug, Clone, PartialEq)]
pub struct CompileReport {
    pub output_path: PathBuf,
    pub page_count: usize,
    pub failures: Vec<PageFailure>,
}

impl CompileReport {
    pub fn file_name(&self) -> String {
        crate::state::data::file_name_of(&self.output_path)
    }
}

pub trait DocumentWriter {
    /// Write `pages` in order into a new document inside `output_folder`
    fn write(&self, pages: &[Page], output_folder: &Path) -> Result<CompileReport>;
}

/// Write the document on a blocking thread so the UI stays responsive
pub async fn compile_in_background(
    pages: Vec<Page>,
    output_folder: PathBuf,
) -> std::result::Result<CompileReport, String> {
    tokio::task::spawn_blocking(move || {
        DocxWriter::default()
            .write(&pages, &output_folder)
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::TimestampSource;
    use chrono::NaiveDate;

    #[test]
    fn test_paginate_uses_position() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let entries = vec![
            ImageEntry::new(ts, "/s/z.png", TimestampSource::Metadata),
            ImageEntry::new(ts, "/s/a.png", TimestampSource::Filesystem),
        ];

        let pages = paginate(entries);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].path, PathBuf::from("/s/z.png"));
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].captured_at, ts);
    }

    #[test]
    fn test_paginate_empty() {
        assert!(paginate(Vec::new()).is_empty());
    }
}
