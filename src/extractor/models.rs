//! Data structures for yt-dlp probe output

use serde::{Deserialize, Serialize};

/// One video's metadata as reported by `yt-dlp --dump-json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbedVideo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Canonical page URL; distinct from the top-level `url` field, which
    /// yt-dlp fills with the selected format's direct media URL
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub formats: Vec<ProbedFormat>,
    /// Id of the format yt-dlp itself would pick ("best"); used for the
    /// placeholder when no audio+video format exists
    #[serde(default)]
    pub format_id: Option<String>,
}

/// One stream variant as reported by yt-dlp.
///
/// yt-dlp reports a codec of `"none"` (the string) for streams that lack
/// that track, so both `None` and `Some("none")` mean absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbedFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    pub format_note: Option<String>,
    pub resolution: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    pub fps: Option<f32>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

impl ProbedFormat {
    /// True when the stream actually carries the named track
    fn codec_present(codec: &Option<String>) -> bool {
        matches!(codec.as_deref(), Some(c) if c != "none")
    }

    pub fn has_audio(&self) -> bool {
        Self::codec_present(&self.acodec)
    }

    pub fn has_video(&self) -> bool {
        Self::codec_present(&self.vcodec)
    }
}

/// One entry of a `--flat-playlist` expansion.
///
/// Flat playlist entries carry the page URL in `url`; when yt-dlp returns a
/// full video object instead (single-video URL), `url` is the direct media
/// URL and `webpage_url` is the page, so `source_url` prefers the latter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PlaylistEntry {
    pub fn source_url(&self) -> Option<&str> {
        self.webpage_url.as_deref().or(self.url.as_deref())
    }
}
