/// Screenshot scanning module
///
/// This module handles:
/// - Resolving capture times from EXIF or the filesystem (date.rs)
/// - Detecting pages that look like sheet music (classify.rs)
/// - Discovering and ordering candidate images in a folder (ingest.rs)

use image::{DynamicImage, ImageReader, ImageResult};
use std::path::Path;

pub mod classify;
pub mod date;
pub mod ingest;

/// Decode an image, picking the decoder from the file's leading bytes
/// rather than its extension
pub fn decode_image(path: &Path) -> ImageResult<DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}
