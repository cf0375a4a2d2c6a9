//! vidgrab library
//!
//! Probe a video or playlist URL through yt-dlp, normalize the available
//! formats into a catalog, track the user's selection, aggregate download
//! sizes, and orchestrate sequential downloads with progress reporting.

pub mod catalog;
pub mod downloader;
pub mod extractor;
pub mod session;
pub mod utils;

// Re-export main types for easier use
pub use catalog::{human_size, total_download_size, CatalogBuilder, FormatRecord, VideoRecord};
pub use downloader::{DownloadOrchestrator, DownloadPhase, DownloadResult};
pub use extractor::{MediaSource, YtDlpSource};
pub use session::{DownloadHistory, SelectionState};
pub use utils::{AppSettings, DownloadFolder, VidgrabError};
