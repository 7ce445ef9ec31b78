/// Persistent application settings
///
/// The two folders and the classifier configuration are stored as JSON
/// in the user's config directory:
/// - Linux: ~/.config/sheet-music-compiler/settings.json
/// - macOS: ~/Library/Application Support/sheet-music-compiler/settings.json
/// - Windows: %APPDATA%\sheet-music-compiler\settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::scan::classify::Thresholds;

/// How the sheet music classifier takes part in a scan
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMode {
    /// Show every image, nothing pre-ticked
    #[default]
    Off,
    /// Show every image, tick the ones that look like sheet music
    Preselect,
    /// Drop images that do not look like sheet music
    Filter,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Folder scanned for screenshots
    pub source_folder: PathBuf,
    /// Folder the compiled document is written to
    pub output_folder: PathBuf,
    pub classifier_mode: ClassifierMode,
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let desktop = dirs::desktop_dir().unwrap_or_else(|| home.join("Desktop"));
        let documents = dirs::document_dir().unwrap_or_else(|| home.join("Documents"));

        Self {
            source_folder: desktop.join("Screenshots"),
            output_folder: documents.join("Sheet Music"),
            classifier_mode: ClassifierMode::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Settings {
    /// Convert to JSON string for storage
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the path where the settings file should be stored
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("sheet-music-compiler");
        path.push("settings.json");
        path
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                if path.exists() {
                    warn!("Ignoring settings at {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!("Settings saved to {}", path.display());
        Ok(())
    }
}
