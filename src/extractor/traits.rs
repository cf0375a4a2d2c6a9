use crate::extractor::models::{PlaylistEntry, ProbedVideo};
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Synchronous progress sink for a single fetch: (downloaded bytes, total
/// bytes if known). Invoked repeatedly on the calling task while the fetch
/// runs; there is never more than one fetch in flight per session.
pub type ProgressSink<'a> = &'a mut (dyn FnMut(u64, Option<u64>) + Send);

/// Boundary to the extraction/download collaborator.
///
/// Site-specific parsing, stream merging and container conversion all live
/// behind this trait; the crate's own code only shapes requests to it and
/// normalizes its responses.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Unique identifier for this source (e.g. "yt-dlp")
    fn id(&self) -> &'static str;

    /// Probe metadata for a single URL without transferring media
    async fn probe(&self, url: &str) -> Result<ProbedVideo>;

    /// Expand a URL into its playlist entries without transferring media.
    /// A plain video URL expands to a single entry.
    async fn probe_playlist(&self, url: &str) -> Result<Vec<PlaylistEntry>>;

    /// Fetch the stream selected by `format_selector`, merge it into a
    /// single container and write it to `output_path`. Reports byte-level
    /// progress through `on_progress`.
    async fn fetch(
        &self,
        url: &str,
        format_selector: &str,
        output_path: &Path,
        on_progress: ProgressSink<'_>,
    ) -> Result<PathBuf>;
}
