//! yt-dlp backed implementation of [`MediaSource`]
//!
//! Probing uses `--dump-json --no-download` so no media is transferred.
//! Fetching spawns yt-dlp with a `--progress-template` that prints plain
//! `downloaded/total` byte pairs, one per line, which we relay to the
//! caller's progress sink. Retry policy (socket timeouts, fragment retries)
//! is yt-dlp's own; this layer performs none.

use crate::extractor::models::{PlaylistEntry, ProbedVideo};
use crate::extractor::traits::{MediaSource, ProgressSink};
use crate::utils::config::AppSettings;
use crate::utils::error::VidgrabError;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

const PROGRESS_TEMPLATE: &str =
    "download:%(progress.downloaded_bytes)s/%(progress.total_bytes)s";

/// Media source backed by the yt-dlp executable
pub struct YtDlpSource {
    ytdlp_path: PathBuf,
    settings: AppSettings,
}

impl YtDlpSource {
    /// Locate yt-dlp and build a source with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(AppSettings::default())
    }

    pub fn with_settings(settings: AppSettings) -> Result<Self> {
        let ytdlp_path = match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                path
            }
            None => {
                error!("yt-dlp not found in PATH or common install locations");
                return Err(VidgrabError::YtDlpNotFound.into());
            }
        };

        Ok(Self {
            ytdlp_path,
            settings,
        })
    }

    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }
}

#[async_trait]
impl MediaSource for YtDlpSource {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<ProbedVideo> {
        debug!("Probing video info for URL: {}", url);

        let output = Command::new(&self.ytdlp_path)
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("--socket-timeout")
            .arg(self.settings.socket_timeout_secs.to_string())
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp probe failed: {}", error_msg);
            return Err(VidgrabError::Extraction(error_msg.to_string()).into());
        }

        let json_str = String::from_utf8(output.stdout)?;
        let video: ProbedVideo = serde_json::from_str(&json_str)?;

        Ok(video)
    }

    async fn probe_playlist(&self, url: &str) -> Result<Vec<PlaylistEntry>> {
        debug!("Probing playlist entries for URL: {}", url);

        let output = Command::new(&self.ytdlp_path)
            .arg("--flat-playlist")
            .arg("--dump-json")
            .arg("--no-warnings")
            .arg("--socket-timeout")
            .arg(self.settings.socket_timeout_secs.to_string())
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp playlist probe failed: {}", error_msg);
            return Err(VidgrabError::Extraction(error_msg.to_string()).into());
        }

        let json_str = String::from_utf8(output.stdout)?;
        let mut entries = Vec::new();

        for line in json_str.lines() {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<PlaylistEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    // One malformed entry must not abort the playlist
                    warn!("Skipping unparseable playlist entry: {}", e);
                }
            }
        }

        Ok(entries)
    }

    async fn fetch(
        &self,
        url: &str,
        format_selector: &str,
        output_path: &Path,
        on_progress: ProgressSink<'_>,
    ) -> Result<PathBuf> {
        info!(
            "Fetching {} (format: {}) -> {}",
            url,
            format_selector,
            output_path.display()
        );

        let mut child = Command::new(&self.ytdlp_path)
            .arg("-f")
            .arg(format_selector)
            .arg("-o")
            .arg(output_path)
            .arg("--merge-output-format")
            .arg(&self.settings.merge_format)
            .arg("--newline")
            .arg("--no-warnings")
            .arg("--no-playlist")
            .arg("--socket-timeout")
            .arg(self.settings.socket_timeout_secs.to_string())
            .arg("--retries")
            .arg(self.settings.retries.to_string())
            .arg("--fragment-retries")
            .arg(self.settings.fragment_retries.to_string())
            .arg("--progress-template")
            .arg(PROGRESS_TEMPLATE)
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Collect stderr in the background for the failure message
        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                let mut collected = Vec::new();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("yt-dlp stderr: {}", line);
                    collected.push(line);
                }
                collected.join("\n")
            })
        });

        // Relay progress lines as they arrive
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                if let Some((downloaded, total)) = parse_progress_line(&line) {
                    on_progress(downloaded, total);
                }
            }
        }

        let status = child.wait().await?;

        if !status.success() {
            let stderr_text = match stderr_task {
                Some(task) => task.await.unwrap_or_default(),
                None => String::new(),
            };
            error!("yt-dlp download failed: {}", stderr_text);
            return Err(VidgrabError::Download(stderr_text).into());
        }

        Ok(output_path.to_path_buf())
    }
}

/// Parse one progress-template line of the form `downloaded/total`.
///
/// yt-dlp prints `NA` for fields it does not know and may report byte
/// counts as floats; anything else on stdout is ignored.
pub(crate) fn parse_progress_line(line: &str) -> Option<(u64, Option<u64>)> {
    let (downloaded_str, total_str) = line.trim().split_once('/')?;

    let downloaded = downloaded_str.parse::<f64>().ok()? as u64;
    let total = total_str
        .parse::<f64>()
        .ok()
        .filter(|t| *t > 0.0)
        .map(|t| t as u64);

    Some((downloaded, total))
}

/// Find the yt-dlp binary: PATH first, then common install locations.
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Ok(path) = which::which("yt-dlp") {
        if path.exists() {
            return Some(path);
        }
    }

    let common_paths = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "~/.local/bin/yt-dlp",
    ];

    for path_str in common_paths {
        let expanded = if let Some(rest) = path_str.strip_prefix("~/") {
            match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            }
        } else {
            PathBuf::from(path_str)
        };

        if expanded.is_file() {
            return Some(expanded);
        }
    }

    None
}
