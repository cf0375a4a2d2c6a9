//! Video/format catalog: normalization and size aggregation

pub mod builder;
pub mod models;
pub mod size;

pub use builder::CatalogBuilder;
pub use models::{FormatRecord, VideoRecord};
pub use size::{human_size, total_download_size};
