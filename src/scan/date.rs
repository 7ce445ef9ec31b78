/// Capture-time resolution for a single image
///
/// Tries the embedded EXIF timestamps first and falls back to the
/// filesystem modification time. Resolution never fails: a file whose
/// metadata and mtime are both unreadable gets the Unix epoch.

use chrono::{DateTime, Local, NaiveDateTime};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::state::data::{ImageEntry, TimestampSource};

/// Format of EXIF date strings, e.g. "2024:01:03 14:22:10"
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Tags consulted, in priority order. The first one present decides.
const DATE_TAGS: [exif::Tag; 2] = [exif::Tag::DateTimeOriginal, exif::Tag::DateTime];

/// Resolve the timestamp of the image at `path` and wrap it in an entry
pub fn resolve(path: &Path) -> ImageEntry {
    if let Some(timestamp) = capture_time(path) {
        return ImageEntry::new(timestamp, path, TimestampSource::Metadata);
    }

    match modified_time(path) {
        Some(timestamp) => ImageEntry::new(timestamp, path, TimestampSource::Filesystem),
        None => {
            debug!("No usable timestamp for {}, using epoch", path.display());
            ImageEntry::new(NaiveDateTime::default(), path, TimestampSource::Unknown)
        }
    }
}

/// Read the capture time from EXIF metadata, if present and well-formed
pub fn capture_time(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);

    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("No EXIF in {}: {}", path.display(), e);
            return None;
        }
    };

    let field = DATE_TAGS
        .iter()
        .find_map(|&tag| exif.get_field(tag, exif::In::PRIMARY))?;

    let raw = match field.value {
        exif::Value::Ascii(ref values) => values.first()?.clone(),
        _ => return None,
    };

    let text = String::from_utf8_lossy(&raw);
    let parsed = parse_exif_datetime(&text);
    if parsed.is_none() {
        debug!("Unparseable {} in {}: {:?}", field.tag, path.display(), text);
    }
    parsed
}

/// Parse an EXIF date string, ignoring padding and NUL terminators
pub fn parse_exif_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATE_FORMAT).ok()
}

/// Filesystem last-modification time in local time
pub fn modified_time(path: &Path) -> Option<NaiveDateTime> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified).naive_local())
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Build a minimal little-endian TIFF carrying only date tags.
    ///
    /// `date_time` goes into IFD0 (DateTime), `original` into an Exif
    /// sub-IFD (DateTimeOriginal). Strings must be 19 characters.
    pub fn tiff_with_dates(date_time: Option<&str>, original: Option<&str>) -> Vec<u8> {
        fn u16le(buf: &mut Vec<u8>, v: u16) {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        fn u32le(buf: &mut Vec<u8>, v: u32) {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        fn ascii(buf: &mut Vec<u8>, s: &str) {
            let mut bytes = s.as_bytes().to_vec();
            bytes.resize(19, b' ');
            bytes.push(0);
            buf.extend_from_slice(&bytes);
        }

        let count = date_time.is_some() as u32 + original.is_some() as u32;
        let mut next = 8 + 2 + 12 * count + 4;
        let mut take = |len: u32| {
            let at = next;
            next += len;
            at
        };
        let date_at = date_time.map(|_| take(20));
        let exif_ifd_at = original.map(|_| take(18));
        let original_at = original.map(|_| take(20));

        let mut buf = b"II*\0".to_vec();
        u32le(&mut buf, 8);
        u16le(&mut buf, count as u16);
        if let Some(at) = date_at {
            u16le(&mut buf, 0x0132);
            u16le(&mut buf, 2);
            u32le(&mut buf, 20);
            u32le(&mut buf, at);
        }
        if let Some(at) = exif_ifd_at {
            u16le(&mut buf, 0x8769);
            u16le(&mut buf, 4);
            u32le(&mut buf, 1);
            u32le(&mut buf, at);
        }
        u32le(&mut buf, 0);

        if let Some(s) = date_time {
            ascii(&mut buf, s);
        }
        if let (Some(s), Some(at)) = (original, original_at) {
            u16le(&mut buf, 1);
            u16le(&mut buf, 0x9003);
            u16le(&mut buf, 2);
            u32le(&mut buf, 20);
            u32le(&mut buf, at);
            u32le(&mut buf, 0);
            ascii(&mut buf, s);
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::tiff_with_dates;
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_exif_datetime() {
        assert_eq!(parse_exif_datetime("2024:01:03 10:00:00"), Some(at(2024, 1, 3, 10)));
        assert_eq!(parse_exif_datetime("2024:01:03 10:00:00\0"), Some(at(2024, 1, 3, 10)));
        assert_eq!(parse_exif_datetime("2024-01-03 10:00:00"), None);
        assert_eq!(parse_exif_datetime("    :  :     :  :  "), None);
    }

    #[test]
    fn test_metadata_date_is_used() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.tiff");
        std::fs::write(&path, tiff_with_dates(Some("2024:01:03 10:00:00"), None)).unwrap();

        let entry = resolve(&path);
        assert_eq!(entry.timestamp, at(2024, 1, 3, 10));
        assert_eq!(entry.source, TimestampSource::Metadata);
    }

    #[test]
    fn test_original_capture_time_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.tiff");
        let bytes = tiff_with_dates(Some("2024:05:05 09:00:00"), Some("2024:01:01 08:00:00"));
        std::fs::write(&path, bytes).unwrap();

        assert_eq!(resolve(&path).timestamp, at(2024, 1, 1, 8));
    }

    #[test]
    fn test_unparseable_metadata_falls_back_to_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.tiff");
        std::fs::write(&path, tiff_with_dates(Some("sometime last week"), None)).unwrap();

        let entry = resolve(&path);
        assert_eq!(entry.source, TimestampSource::Filesystem);
        assert_eq!(Some(entry.timestamp), modified_time(&path));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let entry = resolve(&path);
        assert_eq!(entry.source, TimestampSource::Filesystem);

        let age = Local::now().naive_local() - entry.timestamp;
        assert!(age.num_hours().abs() < 1);
    }

    #[test]
    fn test_missing_file_still_resolves() {
        let entry = resolve(Path::new("/definitely/not/here.png"));
        assert_eq!(entry.source, TimestampSource::Unknown);
        assert_eq!(entry.timestamp, NaiveDateTime::default());
    }
}
