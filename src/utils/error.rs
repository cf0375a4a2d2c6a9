//! Error handling for vidgrab

use thiserror::Error;

/// Main error type for vidgrab
#[derive(Debug, Error)]
pub enum VidgrabError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Failed to extract video info: {0}")]
    Extraction(String),

    #[error("Download failed: {0}")]
    Download(String),

    /// Selected format id is absent from the catalog. Handled internally by
    /// falling back to the best available format, never shown to the user.
    #[error("Format not found: {0}")]
    FormatNotFound(String),

    #[error("Thumbnail fetch failed: {0}")]
    ThumbnailFetch(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
