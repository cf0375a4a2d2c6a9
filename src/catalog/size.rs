//! Aggregate download size
//!
//! Pure functions over the catalog and the user's per-video format choice;
//! recomputed on every selection change.

use crate::catalog::models::VideoRecord;
use std::collections::HashMap;

/// Total bytes for the given videos under the given format choices.
///
/// A video with an explicit choice contributes that format's size (0 when
/// the id is not in its catalog); otherwise it contributes its best
/// format's size. The sum is order-independent and side-effect free.
pub fn total_download_size<'a, I>(videos: I, format_by_url: &HashMap<String, String>) -> u64
where
    I: IntoIterator<Item = &'a VideoRecord>,
{
    videos
        .into_iter()
        .map(|video| match format_by_url.get(&video.source_url) {
            Some(format_id) => video
                .format_by_id(format_id)
                .map(|f| f.filesize_bytes)
                .unwrap_or(0),
            None => video.best_format().map(|f| f.filesize_bytes).unwrap_or(0),
        })
        .sum()
}

/// Human-readable byte count for display
pub fn human_size(bytes: u64) -> String {
    let size = bytes as f64;

    if size >= 1_000_000_000.0 {
        format!("{:.2} GB", size / 1_000_000_000.0)
    } else if size >= 1_000_000.0 {
        format!("{:.2} MB", size / 1_000_000.0)
    } else if size >= 1_000.0 {
        format!("{:.2} KB", size / 1_000.0)
    } else {
        format!("{} bytes", bytes)
    }
}
