//! Thumbnail fetching
//!
//! A plain HTTP GET of an image URL. Failure is never fatal: callers log
//! the error and render without a thumbnail.

use crate::utils::error::VidgrabError;
use tracing::debug;

/// Fetch thumbnail bytes for display.
pub async fn fetch_thumbnail(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, VidgrabError> {
    debug!("Fetching thumbnail: {}", url);

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(VidgrabError::ThumbnailFetch(format!(
            "HTTP {} for {}",
            response.status(),
            url
        )));
    }

    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
