//! Download orchestration module

pub mod orchestrator;

pub use orchestrator::{DownloadOrchestrator, DownloadPhase, DownloadResult};
