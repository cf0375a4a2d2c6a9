//! Download orchestration
//!
//! One download in flight at a time: `download` blocks the calling task
//! until the collaborator finishes, relaying fractional progress through a
//! synchronous callback. Collaborator failures become a failed
//! [`DownloadResult`] and a log line; they never propagate past this
//! boundary, so sibling downloads in a batch always run.

use crate::catalog::models::VideoRecord;
use crate::extractor::traits::MediaSource;
use crate::session::SelectionState;
use crate::utils::folder::DownloadFolder;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Lifecycle of a single download
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    Idle,
    Requesting,
    Downloading,
    Succeeded,
    Failed,
}

/// Outcome of one download invocation; transient, session-scoped
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub source_url: String,
    pub local_path: Option<PathBuf>,
    pub success: bool,
    pub error: Option<String>,
}

/// Drives the collaborator for one (video, format) pair at a time
pub struct DownloadOrchestrator<'a> {
    source: &'a dyn MediaSource,
    folder: DownloadFolder,
    merge_format: String,
    phase: DownloadPhase,
}

impl<'a> DownloadOrchestrator<'a> {
    pub fn new(source: &'a dyn MediaSource, folder: DownloadFolder, merge_format: &str) -> Self {
        Self {
            source,
            folder,
            merge_format: merge_format.to_string(),
            phase: DownloadPhase::Idle,
        }
    }

    pub fn phase(&self) -> &DownloadPhase {
        &self.phase
    }

    /// Download one video in the given format.
    ///
    /// `on_progress` receives fractions in [0, 1], monotonically
    /// non-decreasing, and nothing at all while the total size is unknown.
    /// If the exact format id is unavailable the selector falls back to the
    /// collaborator's best audio-compatible stream.
    pub async fn download(
        &mut self,
        source_url: &str,
        format_id: &str,
        mut on_progress: impl FnMut(f64) + Send,
    ) -> DownloadResult {
        self.phase = DownloadPhase::Requesting;
        debug!("Requesting {} (format {})", source_url, format_id);

        if let Err(e) = self.folder.ensure().await {
            self.phase = DownloadPhase::Failed;
            warn!("Download folder unavailable: {}", e);
            return DownloadResult {
                source_url: source_url.to_string(),
                local_path: None,
                success: false,
                error: Some(e.to_string()),
            };
        }

        let output_path = self.folder.output_path(&self.merge_format);
        let selector = format!("{}+bestaudio[ext=m4a]/best", format_id);

        self.phase = DownloadPhase::Downloading;

        let mut last_fraction = 0.0_f64;
        let mut sink = |downloaded: u64, total: Option<u64>| {
            // No emission while the total is unknown
            if let Some(total) = total.filter(|t| *t > 0) {
                let fraction = (downloaded as f64 / total as f64).clamp(0.0, 1.0);
                if fraction >= last_fraction {
                    last_fraction = fraction;
                    on_progress(fraction);
                }
            }
        };

        match self
            .source
            .fetch(source_url, &selector, &output_path, &mut sink)
            .await
        {
            Ok(local_path) => {
                self.phase = DownloadPhase::Succeeded;
                info!("Downloaded {} -> {}", source_url, local_path.display());
                DownloadResult {
                    source_url: source_url.to_string(),
                    local_path: Some(local_path),
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                self.phase = DownloadPhase::Failed;
                warn!("Download of {} failed: {}", source_url, e);
                DownloadResult {
                    source_url: source_url.to_string(),
                    local_path: None,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Download each video sequentially, resolving the format from the
    /// selection (or the best format when none was chosen). A failed video
    /// does not abort its siblings.
    pub async fn download_batch(
        &mut self,
        videos: &[&VideoRecord],
        selection: &SelectionState,
        mut on_progress: impl FnMut(&str, f64) + Send,
    ) -> Vec<DownloadResult> {
        let mut results = Vec::with_capacity(videos.len());

        for video in videos {
            let format_id = selection
                .chosen_format(&video.source_url)
                .map(str::to_string)
                .or_else(|| video.best_format().map(|f| f.format_id.clone()))
                .unwrap_or_else(|| "best".to_string());

            let url = video.source_url.clone();
            let result = self
                .download(&video.source_url, &format_id, |fraction| {
                    on_progress(&url, fraction)
                })
                .await;
            results.push(result);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::models::{PlaylistEntry, ProbedVideo};
    use crate::extractor::traits::ProgressSink;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::TempDir;

    /// Collaborator stand-in that replays scripted progress events
    struct ScriptedSource {
        events: Vec<(u64, Option<u64>)>,
        fail: bool,
    }

    #[async_trait]
    impl MediaSource for ScriptedSource {
        fn id(&self) -> &'static str {
            "scripted"
        }

        async fn probe(&self, _url: &str) -> Result<ProbedVideo> {
            unimplemented!("not used by orchestrator tests")
        }

        async fn probe_playlist(&self, _url: &str) -> Result<Vec<PlaylistEntry>> {
            unimplemented!("not used by orchestrator tests")
        }

        async fn fetch(
            &self,
            _url: &str,
            _format_selector: &str,
            output_path: &Path,
            on_progress: ProgressSink<'_>,
        ) -> Result<PathBuf> {
            for (downloaded, total) in &self.events {
                on_progress(*downloaded, *total);
            }
            if self.fail {
                anyhow::bail!("scripted failure");
            }
            std::fs::write(output_path, b"media")?;
            Ok(output_path.to_path_buf())
        }
    }

    #[tokio::test]
    async fn test_progress_fractions_monotone_and_clamped() {
        let temp = TempDir::new().unwrap();
        let source = ScriptedSource {
            events: vec![
                (100, Some(1000)),
                (50, Some(1000)),   // regression, must be suppressed
                (500, Some(1000)),
                (1500, Some(1000)), // overshoot, must clamp to 1.0
            ],
            fail: false,
        };
        let mut orchestrator = DownloadOrchestrator::new(
            &source,
            DownloadFolder::new(temp.path()),
            "mp4",
        );

        let mut fractions = Vec::new();
        let result = orchestrator
            .download("urlA", "f1", |f| fractions.push(f))
            .await;

        assert!(result.success);
        assert_eq!(fractions, vec![0.1, 0.5, 1.0]);
        for pair in fractions.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(orchestrator.phase(), &DownloadPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_no_progress_when_total_unknown() {
        let temp = TempDir::new().unwrap();
        let source = ScriptedSource {
            events: vec![(100, None), (500, None), (900, Some(0))],
            fail: false,
        };
        let mut orchestrator = DownloadOrchestrator::new(
            &source,
            DownloadFolder::new(temp.path()),
            "mp4",
        );

        let mut calls = 0;
        let result = orchestrator.download("urlA", "f1", |_| calls += 1).await;

        assert!(result.success);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_failure_becomes_failed_result() {
        let temp = TempDir::new().unwrap();
        let source = ScriptedSource {
            events: vec![],
            fail: true,
        };
        let mut orchestrator = DownloadOrchestrator::new(
            &source,
            DownloadFolder::new(temp.path()),
            "mp4",
        );

        let result = orchestrator.download("urlA", "f1", |_| {}).await;

        assert!(!result.success);
        assert!(result.local_path.is_none());
        assert!(result.error.unwrap().contains("scripted failure"));
        assert_eq!(orchestrator.phase(), &DownloadPhase::Failed);
    }

    #[tokio::test]
    async fn test_successful_download_writes_file() {
        let temp = TempDir::new().unwrap();
        let source = ScriptedSource {
            events: vec![(10, Some(10))],
            fail: false,
        };
        let mut orchestrator = DownloadOrchestrator::new(
            &source,
            DownloadFolder::new(temp.path().join("downloads")),
            "mp4",
        );

        let result = orchestrator.download("urlA", "f1", |_| {}).await;

        let path = result.local_path.unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("video_") && name.ends_with(".mp4"));
    }
}
