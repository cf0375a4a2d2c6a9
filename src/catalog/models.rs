//! Normalized catalog records
//!
//! Built once per lookup by [`crate::catalog::CatalogBuilder`] and immutable
//! afterwards; a new URL lookup replaces the whole list.

use serde::{Deserialize, Serialize};

/// One selectable video, keyed by its source URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    /// Unique key; all selection state references videos by this URL
    pub source_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: u64,
    pub view_count: u64,
    pub like_count: u64,
    /// Sorted by filesize descending; never empty
    pub formats: Vec<FormatRecord>,
}

impl VideoRecord {
    /// Best download candidate: the largest format by construction
    pub fn best_format(&self) -> Option<&FormatRecord> {
        self.formats.first()
    }

    /// Find a format by id within this record
    pub fn format_by_id(&self, format_id: &str) -> Option<&FormatRecord> {
        self.formats.iter().find(|f| f.format_id == format_id)
    }

    /// Duration as HH:MM:SS for display
    pub fn duration_display(&self) -> String {
        let secs = self.duration_seconds;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// One selectable stream variant of a video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatRecord {
    /// Collaborator-assigned id, unique within one VideoRecord
    pub format_id: String,
    pub ext: String,
    pub quality_label: String,
    pub resolution: String,
    /// 0 means unknown
    pub filesize_bytes: u64,
    pub fps: f32,
    pub acodec: String,
    pub vcodec: String,
}
