/// Shared data structures for the application state
///
/// These structs represent the data model that flows from
/// the scanner, through the selection screens, into the document writer.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Where an entry's timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// EXIF DateTimeOriginal / DateTime
    Metadata,
    /// Filesystem last-modification time
    Filesystem,
    /// Neither was readable; the Unix epoch stands in
    Unknown,
}

/// One discovered candidate image
///
/// The timestamp is resolved once during the scan and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// Best-effort capture time
    pub timestamp: NaiveDateTime,
    /// Full path to the image file
    pub path: PathBuf,
    pub source: TimestampSource,
}

impl ImageEntry {
    pub fn new(timestamp: NaiveDateTime, path: impl Into<PathBuf>, source: TimestampSource) -> Self {
        Self {
            timestamp,
            path: path.into(),
            source,
        }
    }

    /// Filename only (e.g., "Screenshot 2024-01-03.png")
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

/// One page of the finished document
///
/// `number` is the 1-based position in the finalized sequence,
/// not the order the file was discovered in.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub path: PathBuf,
    pub captured_at: NaiveDateTime,
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
