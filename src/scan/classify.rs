/// Sheet music detection from pixel statistics
///
/// A cheap heuristic, no model involved:
/// 1. portrait pages only (height / width >= 1.2)
/// 2. high contrast (luminance std-dev >= 30)
/// 3. accept when horizontal edge strength beats vertical by 20%
/// 4. otherwise accept when at least 3 of ~10 sampled rows vary (std-dev > 20)
///
/// Images that cannot be decoded are treated as sheet music so a real page
/// is never silently dropped.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Canonical analysis size (width x height)
pub const DEFAULT_CANONICAL_WIDTH: u32 = 400;
pub const DEFAULT_CANONICAL_HEIGHT: u32 = 600;
/// Minimum height / width of the original image
pub const DEFAULT_MIN_ASPECT_RATIO: f64 = 1.2;
/// Minimum luminance std-dev over the whole image (0-255 scale)
pub const DEFAULT_MIN_CONTRAST: f64 = 30.0;
/// Horizontal edge strength must exceed vertical times this
pub const DEFAULT_EDGE_MARGIN: f64 = 1.2;
/// Number of evenly spaced rows sampled for the staff check
pub const DEFAULT_SCAN_LINES: u32 = 10;
/// Row std-dev above which a sampled row counts as varied
pub const DEFAULT_LINE_VARIATION: f64 = 20.0;
/// Varied rows needed to accept
pub const DEFAULT_MIN_VARIED_LINES: usize = 3;

/// Tunable thresholds of the heuristic
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub canonical_width: u32,
    pub canonical_height: u32,
    pub min_aspect_ratio: f64,
    pub min_contrast: f64,
    pub edge_margin: f64,
    pub scan_lines: u32,
    pub line_variation: f64,
    pub min_varied_lines: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            canonical_width: DEFAULT_CANONICAL_WIDTH,
            canonical_height: DEFAULT_CANONICAL_HEIGHT,
            min_aspect_ratio: DEFAULT_MIN_ASPECT_RATIO,
            min_contrast: DEFAULT_MIN_CONTRAST,
            edge_margin: DEFAULT_EDGE_MARGIN,
            scan_lines: DEFAULT_SCAN_LINES,
            line_variation: DEFAULT_LINE_VARIATION,
            min_varied_lines: DEFAULT_MIN_VARIED_LINES,
        }
    }
}

/// The step that decided a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    TooWide,
    LowContrast,
    HorizontalStructure,
    StaffPattern,
    NoStructure,
    /// Could not decode; counted as sheet music
    Unreadable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_sheet_music: bool,
    pub reason: Reason,
}

impl Classification {
    fn accept(reason: Reason) -> Self {
        Self { is_sheet_music: true, reason }
    }

    fn reject(reason: Reason) -> Self {
        Self { is_sheet_music: false, reason }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SheetMusicClassifier {
    thresholds: Thresholds,
}

impl SheetMusicClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Does the image at `path` look like a sheet music page?
    pub fn classify(&self, path: &Path) -> bool {
        self.evaluate(path).is_sheet_music
    }

    /// Classify the image at `path`, reporting which step decided
    pub fn evaluate(&self, path: &Path) -> Classification {
        match super::decode_image(path) {
            Ok(img) => {
                let verdict = self.evaluate_image(&img);
                debug!("{}: {:?}", path.display(), verdict.reason);
                verdict
            }
            Err(e) => {
                debug!("Cannot analyse {}, keeping it: {}", path.display(), e);
                Classification::accept(Reason::Unreadable)
            }
        }
    }

    /// Classify a decoded image
    pub fn evaluate_image(&self, img: &DynamicImage) -> Classification {
        let gray = img.to_luma8();
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Classification::accept(Reason::Unreadable);
        }

        let t = &self.thresholds;
        if (height as f64 / width as f64) < t.min_aspect_ratio {
            return Classification::reject(Reason::TooWide);
        }

        let canonical = imageops::resize(
            &gray,
            t.canonical_width.max(1),
            t.canonical_height.max(1),
            FilterType::Lanczos3,
        );
        self.evaluate_luma(&canonical)
    }

    /// Contrast, edge and scan-line checks on an already normalized image
    pub fn evaluate_luma(&self, gray: &GrayImage) -> Classification {
        let t = &self.thresholds;

        if std_dev(gray.as_raw().iter().copied()) < t.min_contrast {
            return Classification::reject(Reason::LowContrast);
        }

        let (horizontal, vertical) = edge_strength(gray);
        if horizontal > vertical * t.edge_margin {
            return Classification::accept(Reason::HorizontalStructure);
        }

        if varied_scan_lines(gray, t.scan_lines, t.line_variation) >= t.min_varied_lines {
            return Classification::accept(Reason::StaffPattern);
        }

        Classification::reject(Reason::NoStructure)
    }
}

/// Population standard deviation
fn std_dev(values: impl Iterator<Item = u8>) -> f64 {
    let (mut n, mut sum, mut sum_sq) = (0u64, 0f64, 0f64);
    for v in values {
        let v = v as f64;
        n += 1;
        sum += v;
        sum_sq += v * v;
    }
    if n == 0 {
        return 0.0;
    }
    let mean = sum / n as f64;
    (sum_sq / n as f64 - mean * mean).max(0.0).sqrt()
}

/// Mean absolute difference between horizontal neighbours and between
/// vertical neighbours, as (horizontal, vertical)
fn edge_strength(gray: &GrayImage) -> (f64, f64) {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let px = gray.as_raw();

    let mut horizontal = 0u64;
    let mut vertical = 0u64;
    for y in 0..h {
        let row = &px[y * w..(y + 1) * w];
        for x in 1..w {
            horizontal += row[x].abs_diff(row[x - 1]) as u64;
        }
        if y > 0 {
            let above = &px[(y - 1) * w..y * w];
            for x in 0..w {
                vertical += row[x].abs_diff(above[x]) as u64;
            }
        }
    }

    let mean = |total: u64, count: usize| {
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    };
    (
        mean(horizontal, h * w.saturating_sub(1)),
        mean(vertical, h.saturating_sub(1) * w),
    )
}

/// Count sampled rows whose luminance std-dev exceeds `threshold`
fn varied_scan_lines(gray: &GrayImage, lines: u32, threshold: f64) -> usize {
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let step = (height / lines.max(1)).max(1) as usize;
    let px = gray.as_raw();

    (0..height as usize)
        .step_by(step)
        .filter(|&y| std_dev(px[y * w..(y + 1) * w].iter().copied()) > threshold)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};
    use tempfile::TempDir;

    fn luma(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> DynamicImage {
        let buf: GrayImage = ImageBuffer::from_fn(width, height, |x, y| Luma([f(x, y)]));
        DynamicImage::ImageLuma8(buf)
    }

    fn stripes(x: u32, _y: u32) -> u8 {
        if (x / 4) % 2 == 0 { 0 } else { 255 }
    }

    fn checkerboard(x: u32, y: u32) -> u8 {
        if ((x / 8) + (y / 8)) % 2 == 0 { 0 } else { 255 }
    }

    fn bands(_x: u32, y: u32) -> u8 {
        if (y / 8) % 2 == 0 { 0 } else { 255 }
    }

    #[test]
    fn test_landscape_gray_is_rejected() {
        let classifier = SheetMusicClassifier::default();
        let verdict = classifier.evaluate_image(&luma(1200, 800, |_, _| 128));
        assert!(!verdict.is_sheet_music);
        assert_eq!(verdict.reason, Reason::TooWide);
    }

    #[test]
    fn test_low_contrast_portrait_is_rejected() {
        let classifier = SheetMusicClassifier::default();
        let verdict = classifier.evaluate_image(&luma(400, 800, |x, _| 120 + (x % 10) as u8));
        assert_eq!(verdict, Classification::reject(Reason::LowContrast));
    }

    #[test]
    fn test_horizontal_edges_accept() {
        let classifier = SheetMusicClassifier::default();
        let verdict = classifier.evaluate_image(&luma(400, 1600, stripes));
        assert_eq!(verdict, Classification::accept(Reason::HorizontalStructure));
    }

    #[test]
    fn test_scan_lines_accept_when_edges_are_balanced() {
        let classifier = SheetMusicClassifier::default();
        let gray = luma(400, 600, checkerboard).to_luma8();

        let (h, v) = edge_strength(&gray);
        assert!(h <= v * DEFAULT_EDGE_MARGIN);
        assert_eq!(classifier.evaluate_luma(&gray), Classification::accept(Reason::StaffPattern));
    }

    #[test]
    fn test_flat_rows_without_horizontal_edges_are_rejected() {
        let classifier = SheetMusicClassifier::default();
        let gray = luma(400, 600, bands).to_luma8();
        assert_eq!(classifier.evaluate_luma(&gray), Classification::reject(Reason::NoStructure));
    }

    #[test]
    fn test_aspect_ratio_boundary_passes() {
        let classifier = SheetMusicClassifier::default();
        let verdict = classifier.evaluate_image(&luma(500, 600, stripes));
        assert_ne!(verdict.reason, Reason::TooWide);
    }

    #[test]
    fn test_thresholds_are_tunable() {
        let classifier = SheetMusicClassifier::new(Thresholds {
            min_varied_lines: 11,
            ..Thresholds::default()
        });
        let gray = luma(400, 600, checkerboard).to_luma8();
        assert_eq!(classifier.evaluate_luma(&gray), Classification::reject(Reason::NoStructure));
    }

    #[test]
    fn test_std_dev_and_scan_lines() {
        assert_eq!(std_dev([10u8, 10, 10].into_iter()), 0.0);
        assert!((std_dev([0u8, 255].into_iter()) - 127.5).abs() < 1e-9);

        let gray = luma(400, 600, checkerboard).to_luma8();
        assert_eq!(varied_scan_lines(&gray, 10, 20.0), 10);
    }

    #[test]
    fn test_unreadable_files_count_as_sheet_music() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.png");
        let text = dir.path().join("notes.jpg");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&text, b"this is not an image").unwrap();

        let classifier = SheetMusicClassifier::default();
        assert_eq!(classifier.evaluate(&empty), Classification::accept(Reason::Unreadable));
        assert!(classifier.classify(&text));
        assert!(classifier.classify(&dir.path().join("missing.png")));
    }

    #[test]
    fn test_classification_from_file_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.png");
        let chat = dir.path().join("chat.png");
        luma(400, 1600, stripes).save(&page).unwrap();
        luma(1200, 800, |_, _| 128).save(&chat).unwrap();

        let classifier = SheetMusicClassifier::default();
        let first = classifier.evaluate(&page);
        assert!(first.is_sheet_music);
        assert_eq!(classifier.evaluate(&page), first);
        assert!(!classifier.classify(&chat));
    }

    #[test]
    fn test_wrong_extension_is_still_analysed() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("chat.png");
        luma(1200, 800, |_, _| 128).save(&png).unwrap();
        let jpg = dir.path().join("chat.jpg");
        std::fs::copy(&png, &jpg).unwrap();

        let classifier = SheetMusicClassifier::default();
        assert_eq!(classifier.evaluate(&png), Classification::reject(Reason::TooWide));
        assert_eq!(classifier.evaluate(&jpg), Classification::reject(Reason::TooWide));
    }
}
