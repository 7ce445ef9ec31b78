/// Folder scanning: discover candidate images, date them, sort them
///
/// The classifier is an optional stage. By default every discovered
/// image reaches the selection screen and the user decides.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::classify::SheetMusicClassifier;
use super::date;
use crate::error::{CompilerError, Result};
use crate::state::data::ImageEntry;
use crate::state::selection::SelectionState;
use crate::state::settings::{ClassifierMode, Settings};

/// Supported image file extensions (matched case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tiff", "gif"];

/// Result of scanning a folder, ready to become a selection session
#[derive(Debug, Clone)]
pub struct Scan {
    /// Chronologically sorted entries
    pub entries: Vec<ImageEntry>,
    /// Initial include flag for each entry
    pub preselected: Vec<bool>,
}

impl Scan {
    pub fn into_selection(self) -> SelectionState {
        SelectionState::preselected(self.entries, self.preselected)
    }
}

/// Is `path` one of the supported image types?
pub fn is_image_file(path: &Path) -> bool {
    match path.extension() {
        Some(extension) => {
            let ext = extension.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// List candidate images directly inside `folder`, in file name order
pub fn discover(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        warn!("Source folder not found: {}", folder.display());
        return Err(CompilerError::SourceNotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(CompilerError::NotADirectory(folder.to_path_buf()));
    }

    info!("🔍 Scanning folder: {}", folder.display());

    let files: Vec<PathBuf> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();

    if files.is_empty() {
        warn!("No image files found in {}", folder.display());
        return Err(CompilerError::NoImages(folder.to_path_buf()));
    }

    Ok(files)
}

/// Discover, date and chronologically sort the images in `folder`
pub fn ingest(folder: &Path) -> Result<Vec<ImageEntry>> {
    let files = discover(folder)?;
    info!("Found {} images. Sorting by date...", files.len());

    let mut entries: Vec<ImageEntry> = files.iter().map(|path| date::resolve(path)).collect();
    sort_chronologically(&mut entries);
    Ok(entries)
}

/// Stable sort by timestamp; equal timestamps keep discovery order
pub fn sort_chronologically(entries: &mut [ImageEntry]) {
    entries.sort_by_key(|entry| entry.timestamp);
}

/// Ingest `folder` and apply the classifier according to `mode`
pub fn scan(folder: &Path, mode: ClassifierMode, classifier: &SheetMusicClassifier) -> Result<Scan> {
    let entries = ingest(folder)?;

    let scan = match mode {
        ClassifierMode::Off => Scan {
            preselected: vec![false; entries.len()],
            entries,
        },
        ClassifierMode::Preselect => Scan {
            preselected: entries.iter().map(|e| classifier.classify(&e.path)).collect(),
            entries,
        },
        ClassifierMode::Filter => {
            let total = entries.len();
            let kept: Vec<ImageEntry> = entries
                .into_iter()
                .filter(|e| classifier.classify(&e.path))
                .collect();
            debug!("Classifier kept {} of {} images", kept.len(), total);

            if kept.is_empty() {
                return Err(CompilerError::NoImages(folder.to_path_buf()));
            }
            Scan {
                preselected: vec![true; kept.len()],
                entries: kept,
            }
        }
    };

    Ok(scan)
}

/// Scan on a blocking thread so the UI stays responsive
pub async fn scan_in_background(settings: Settings) -> std::result::Result<Scan, String> {
    tokio::task::spawn_blocking(move || {
        let classifier = SheetMusicClassifier::new(settings.thresholds);
        scan(&settings.source_folder, settings.classifier_mode, &classifier).map_err(|e| {
            if e.is_precondition() {
                info!("Nothing to review: {}", e);
            } else {
                warn!("Scan failed: {}", e);
            }
            e.to_string()
        })
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}
