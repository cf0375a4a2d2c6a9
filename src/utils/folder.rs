//! Download folder management
//!
//! Output files are named `video_<unixtimestamp>.<ext>`. The folder is
//! session-scoped and can be cleared on demand; clearing removes regular
//! files only and leaves subdirectories alone.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Writable directory all downloads land in
#[derive(Debug, Clone)]
pub struct DownloadFolder {
    dir: PathBuf,
}

impl DownloadFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the folder if it does not exist yet
    pub async fn ensure(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .await
                .context("Failed to create download folder")?;
            debug!("Created download folder: {}", self.dir.display());
        }
        Ok(())
    }

    /// Allocate a timestamped output path for the given extension.
    ///
    /// Two downloads in the same second get distinct paths via a numeric
    /// suffix.
    pub fn output_path(&self, ext: &str) -> PathBuf {
        let stamp = Utc::now().timestamp();
        let mut path = self.dir.join(format!("video_{}.{}", stamp, ext));
        let mut bump = 1;
        while path.exists() {
            path = self.dir.join(format!("video_{}_{}.{}", stamp, bump, ext));
            bump += 1;
        }
        path
    }

    /// Delete all regular files in the folder. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut entries = fs::read_dir(&self.dir)
            .await
            .context("Failed to read download folder")?;

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() {
                fs::remove_file(&path)
                    .await
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                removed += 1;
            }
        }

        info!("Cleared {} file(s) from {}", removed, self.dir.display());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_creates_folder() {
        let temp = TempDir::new().unwrap();
        let folder = DownloadFolder::new(temp.path().join("downloads"));
        assert!(!folder.dir().exists());

        folder.ensure().await.unwrap();
        assert!(folder.dir().exists());
    }

    #[tokio::test]
    async fn test_output_path_naming() {
        let temp = TempDir::new().unwrap();
        let folder = DownloadFolder::new(temp.path());

        let path = folder.output_path("mp4");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("video_"));
        assert!(name.ends_with(".mp4"));
    }

    #[tokio::test]
    async fn test_output_path_collision_bumped() {
        let temp = TempDir::new().unwrap();
        let folder = DownloadFolder::new(temp.path());

        let first = folder.output_path("mp4");
        std::fs::write(&first, b"x").unwrap();

        let second = folder.output_path("mp4");
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_clear_removes_files_keeps_dirs() {
        let temp = TempDir::new().unwrap();
        let folder = DownloadFolder::new(temp.path());

        std::fs::write(temp.path().join("video_1.mp4"), b"a").unwrap();
        std::fs::write(temp.path().join("video_2.mp4"), b"b").unwrap();
        std::fs::create_dir(temp.path().join("keep")).unwrap();

        let removed = folder.clear().await.unwrap();
        assert_eq!(removed, 2);
        assert!(temp.path().join("keep").exists());
    }

    #[tokio::test]
    async fn test_clear_missing_folder_is_noop() {
        let temp = TempDir::new().unwrap();
        let folder = DownloadFolder::new(temp.path().join("nope"));
        assert_eq!(folder.clear().await.unwrap(), 0);
    }
}
