pub mod models;
pub mod traits;
pub mod ytdlp;

pub use models::{PlaylistEntry, ProbedFormat, ProbedVideo};
pub use traits::{MediaSource, ProgressSink};
pub use ytdlp::YtDlpSource;
