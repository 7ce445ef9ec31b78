use std::path::Path;
use tracing::{info, warn};

/// Open `folder` in the platform's file browser. Failures are only logged.
pub fn reveal(folder: &Path) {
    match open::that(folder) {
        Ok(()) => info!("📂 Opened {}", folder.display()),
        Err(e) => warn!("Could not open {}: {}", folder.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_folder_is_logged_not_raised() {
        let dir = TempDir::new().unwrap();
        reveal(&dir.path().join("never-created"));
    }
}
