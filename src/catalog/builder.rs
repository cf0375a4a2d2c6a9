//! Format catalog construction
//!
//! Turns raw collaborator probes into normalized [`VideoRecord`]s: playlist
//! URLs expand to one record per entry, format lists are filtered to
//! streams carrying both audio and video, sorted by filesize descending,
//! and padded with a best-available placeholder when the filter empties
//! the list, so every record has at least one selectable option.

use crate::catalog::models::{FormatRecord, VideoRecord};
use crate::extractor::models::ProbedVideo;
use crate::extractor::traits::MediaSource;
use crate::utils::error::VidgrabError;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Builds the catalog for one URL lookup
pub struct CatalogBuilder<'a> {
    source: &'a dyn MediaSource,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(source: &'a dyn MediaSource) -> Self {
        Self { source }
    }

    /// Build one VideoRecord per playlist entry (a plain video URL counts
    /// as a one-entry playlist).
    ///
    /// Entries that individually fail to probe are logged and skipped so a
    /// single bad playlist item never aborts its siblings; a lookup that
    /// resolved to exactly one entry propagates the failure instead.
    pub async fn build(&self, url: &str) -> Result<Vec<VideoRecord>> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(VidgrabError::InvalidUrl(url.to_string()).into());
        }

        let entries = self.source.probe_playlist(url).await?;
        info!("URL expanded to {} entries", entries.len());

        let single = entries.len() == 1;
        let mut records = Vec::with_capacity(entries.len());

        for entry in &entries {
            let Some(entry_url) = entry.source_url() else {
                warn!("Skipping playlist entry without a URL");
                continue;
            };

            match self.source.probe(entry_url).await {
                Ok(probed) => records.push(normalize(entry_url, probed)),
                Err(e) if single => return Err(e),
                Err(e) => {
                    warn!("Skipping playlist entry {}: {}", entry_url, e);
                }
            }
        }

        Ok(records)
    }
}

/// Normalize one probe result into a VideoRecord.
///
/// Keeps only formats with both audio and video codecs, stable-sorts them
/// by filesize descending (ties keep collaborator order), and substitutes
/// a synthetic best-available placeholder when nothing survives the filter.
pub fn normalize(source_url: &str, probed: ProbedVideo) -> VideoRecord {
    let mut formats: Vec<FormatRecord> = probed
        .formats
        .iter()
        .filter(|f| f.has_audio() && f.has_video())
        .map(|f| FormatRecord {
            format_id: f.format_id.clone(),
            ext: f.ext.clone().unwrap_or_else(|| "mp4".to_string()),
            quality_label: f.format_note.clone().unwrap_or_else(|| "N/A".to_string()),
            resolution: f.resolution.clone().unwrap_or_else(|| "N/A".to_string()),
            filesize_bytes: f.filesize.unwrap_or(0),
            fps: f.fps.unwrap_or(0.0),
            acodec: f.acodec.clone().unwrap_or_else(|| "N/A".to_string()),
            vcodec: f.vcodec.clone().unwrap_or_else(|| "N/A".to_string()),
        })
        .collect();

    // Stable: equal sizes keep the collaborator's order
    formats.sort_by(|a, b| b.filesize_bytes.cmp(&a.filesize_bytes));

    if formats.is_empty() {
        let best_id = probed.format_id.clone().unwrap_or_else(|| "best".to_string());
        debug!(
            "No audio+video formats for {}; substituting placeholder '{}'",
            source_url, best_id
        );
        formats.push(FormatRecord {
            format_id: best_id,
            ext: "mp4".to_string(),
            quality_label: "best available".to_string(),
            resolution: "auto".to_string(),
            filesize_bytes: 0,
            fps: 0.0,
            acodec: "N/A".to_string(),
            vcodec: "N/A".to_string(),
        });
    }

    VideoRecord {
        title: probed.title.unwrap_or_else(|| "Untitled".to_string()),
        source_url: source_url.to_string(),
        thumbnail_url: probed.thumbnail,
        duration_seconds: probed.duration.unwrap_or(0.0).max(0.0) as u64,
        view_count: probed.view_count.unwrap_or(0),
        like_count: probed.like_count.unwrap_or(0),
        formats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::models::ProbedFormat;

    fn probed_format(id: &str, size: Option<u64>, acodec: &str, vcodec: &str) -> ProbedFormat {
        ProbedFormat {
            format_id: id.to_string(),
            ext: Some("mp4".to_string()),
            format_note: Some("720p".to_string()),
            resolution: Some("1280x720".to_string()),
            filesize: size,
            fps: Some(30.0),
            acodec: Some(acodec.to_string()),
            vcodec: Some(vcodec.to_string()),
        }
    }

    fn probed_video(formats: Vec<ProbedFormat>) -> ProbedVideo {
        ProbedVideo {
            id: "abc".to_string(),
            title: Some("Sample".to_string()),
            webpage_url: Some("https://example.com/v/abc".to_string()),
            duration: Some(60.0),
            thumbnail: Some("https://example.com/t.jpg".to_string()),
            view_count: Some(100),
            like_count: Some(7),
            formats,
            format_id: Some("22".to_string()),
        }
    }

    #[test]
    fn test_normalize_filters_audio_or_video_only() {
        let probed = probed_video(vec![
            probed_format("v", Some(10), "none", "avc1"),
            probed_format("a", Some(10), "mp4a", "none"),
            probed_format("both", Some(10), "mp4a", "avc1"),
        ]);

        let record = normalize("https://example.com/v/abc", probed);
        assert_eq!(record.formats.len(), 1);
        assert_eq!(record.formats[0].format_id, "both");
    }

    #[test]
    fn test_normalize_sorts_by_size_descending() {
        let probed = probed_video(vec![
            probed_format("small", Some(80_000_000), "mp4a", "avc1"),
            probed_format("big", Some(120_000_000), "mp4a", "avc1"),
            probed_format("unknown", None, "mp4a", "avc1"),
        ]);

        let record = normalize("https://example.com/v/abc", probed);
        let sizes: Vec<u64> = record.formats.iter().map(|f| f.filesize_bytes).collect();
        assert_eq!(sizes, vec![120_000_000, 80_000_000, 0]);

        for pair in record.formats.windows(2) {
            assert!(pair[0].filesize_bytes >= pair[1].filesize_bytes);
        }
    }

    #[test]
    fn test_normalize_sort_is_stable_on_ties() {
        let probed = probed_video(vec![
            probed_format("first", Some(50), "mp4a", "avc1"),
            probed_format("second", Some(50), "mp4a", "avc1"),
        ]);

        let record = normalize("https://example.com/v/abc", probed);
        assert_eq!(record.formats[0].format_id, "first");
        assert_eq!(record.formats[1].format_id, "second");
    }

    #[test]
    fn test_normalize_substitutes_placeholder() {
        let probed = probed_video(vec![
            probed_format("v", Some(10), "none", "avc1"),
            probed_format("a", Some(10), "mp4a", "none"),
        ]);

        let record = normalize("https://example.com/v/abc", probed);
        assert_eq!(record.formats.len(), 1);
        assert_eq!(record.formats[0].format_id, "22");
        assert_eq!(record.formats[0].filesize_bytes, 0);
        assert_eq!(record.formats[0].quality_label, "best available");
    }

    #[test]
    fn test_normalize_placeholder_without_collaborator_hint() {
        let mut probed = probed_video(vec![]);
        probed.format_id = None;

        let record = normalize("https://example.com/v/abc", probed);
        assert_eq!(record.formats[0].format_id, "best");
    }

    #[test]
    fn test_normalize_never_empty_formats() {
        let probed = probed_video(vec![]);
        let record = normalize("https://example.com/v/abc", probed);
        assert!(!record.formats.is_empty());
    }

    #[test]
    fn test_normalize_defaults_for_missing_metadata() {
        let probed = ProbedVideo {
            id: String::new(),
            title: None,
            webpage_url: None,
            duration: None,
            thumbnail: None,
            view_count: None,
            like_count: None,
            formats: vec![],
            format_id: None,
        };

        let record = normalize("https://example.com/v/x", probed);
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.duration_seconds, 0);
        assert_eq!(record.view_count, 0);
        assert_eq!(record.like_count, 0);
    }

    #[test]
    fn test_normalize_keys_by_requested_url() {
        let probed = probed_video(vec![probed_format("both", Some(10), "mp4a", "avc1")]);
        let record = normalize("https://short.link/abc", probed);
        assert_eq!(record.source_url, "https://short.link/abc");
    }
}
