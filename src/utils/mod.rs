//! Shared utilities

pub mod config;
pub mod error;
pub mod folder;
pub mod thumbnail;

pub use config::AppSettings;
pub use error::VidgrabError;
pub use folder::DownloadFolder;
pub use thumbnail::fetch_thumbnail;
