/// Error types shared across the application
///
/// Only whole-batch failures live here. Per-image problems (unreadable
/// metadata, undecodable pixels) are absorbed where they happen and never
/// reach the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompilerError {
    /// The configured source folder does not exist
    #[error("Source folder not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source path exists but is a file
    #[error("Source path is not a folder: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The folder was scanned but held no candidate images
    #[error("No image files found in {}", .0.display())]
    NoImages(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Settings(#[from] serde_json::Error),

    /// The document as a whole could not be produced
    #[error("Failed to write document: {0}")]
    Document(String),
}

impl CompilerError {
    /// True for the conditions that stop the pipeline before selection
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CompilerError::SourceNotFound(_)
                | CompilerError::NotADirectory(_)
                | CompilerError::NoImages(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CompilerError>;
