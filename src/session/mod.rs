//! Session-scoped selection state
//!
//! Created at session start, passed `&mut` into every handler, dropped at
//! session end. All operations key by `source_url`; records themselves are
//! never compared, so two lookups yielding equal-looking records cannot
//! confuse the selection.

use crate::catalog::models::VideoRecord;
use crate::downloader::DownloadResult;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Which videos and which format-per-video the user intends to download
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    selected: HashSet<String>,
    format_by_url: HashMap<String, String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a video from the selection. Re-applying the current
    /// state is a no-op.
    pub fn toggle_select(&mut self, source_url: &str, selected: bool) {
        if selected {
            self.selected.insert(source_url.to_string());
        } else {
            self.selected.remove(source_url);
        }
    }

    /// Upsert the chosen format for a video
    pub fn set_format(&mut self, source_url: &str, format_id: &str) {
        self.format_by_url
            .insert(source_url.to_string(), format_id.to_string());
    }

    /// Select every provided video
    pub fn select_all(&mut self, videos: &[VideoRecord]) {
        self.selected = videos.iter().map(|v| v.source_url.clone()).collect();
    }

    /// Select videos by 1-based catalog index. Out-of-range indices
    /// (including 0) are logged and ignored. Returns how many applied.
    pub fn select_indices(&mut self, videos: &[VideoRecord], indices: &[usize]) -> usize {
        let mut applied = 0;
        for &index in indices {
            match index.checked_sub(1).and_then(|i| videos.get(i)) {
                Some(video) => {
                    self.toggle_select(&video.source_url, true);
                    applied += 1;
                }
                None => warn!("Ignoring out-of-range selection index {}", index),
            }
        }
        applied
    }

    pub fn is_selected(&self, source_url: &str) -> bool {
        self.selected.contains(source_url)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// The selected subset of `videos`, in their original order
    pub fn selected_videos<'a>(&self, videos: &'a [VideoRecord]) -> Vec<&'a VideoRecord> {
        videos
            .iter()
            .filter(|v| self.selected.contains(&v.source_url))
            .collect()
    }

    /// Chosen format for a video, if the user picked one explicitly
    pub fn chosen_format(&self, source_url: &str) -> Option<&str> {
        self.format_by_url.get(source_url).map(String::as_str)
    }

    /// Per-url format choices, as the size calculator consumes them
    pub fn format_by_url(&self) -> &HashMap<String, String> {
        &self.format_by_url
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.format_by_url.clear();
    }
}

/// Session-scoped record of finished downloads
#[derive(Debug, Default)]
pub struct DownloadHistory {
    results: Vec<DownloadResult>,
}

impl DownloadHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: DownloadResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[DownloadResult] {
        &self.results
    }

    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}
