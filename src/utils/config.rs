//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Download location
    pub download_dir: PathBuf,

    /// Container format downloads are merged into
    pub merge_format: String,

    /// Socket timeout passed to yt-dlp (seconds)
    pub socket_timeout_secs: u64,

    /// Retry attempts performed by yt-dlp itself
    pub retries: u32,

    /// Fragment retry attempts performed by yt-dlp itself
    pub fragment_retries: u32,

    /// Whether thumbnails should be fetched for display
    pub show_thumbnails: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from("./downloads")),
            merge_format: "mp4".to_string(),
            socket_timeout_secs: 30,
            retries: 5,
            fragment_retries: 5,
            show_thumbnails: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppSettings::default();
        assert_eq!(config.merge_format, "mp4");
        assert!(config.socket_timeout_secs > 0);
        assert!(config.retries > 0);
        assert!(config.show_thumbnails);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppSettings::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.download_dir, config.download_dir);
        assert_eq!(loaded.retries, config.retries);
    }
}
