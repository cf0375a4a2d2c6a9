//! vidgrab - yt-dlp powered video downloader
//!
//! Paste a video or playlist URL, inspect the available formats, and
//! download the chosen quality. Extraction and muxing are delegated to the
//! yt-dlp executable; this binary is a thin driver over the library.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use vidgrab::catalog::{human_size, total_download_size, CatalogBuilder, VideoRecord};
use vidgrab::downloader::DownloadOrchestrator;
use vidgrab::extractor::YtDlpSource;
use vidgrab::session::{DownloadHistory, SelectionState};
use vidgrab::utils::{fetch_thumbnail, AppSettings, DownloadFolder};

#[derive(Parser)]
#[command(name = "vidgrab", version, about = "Download videos and playlists via yt-dlp")]
struct Cli {
    /// Override the download directory
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect a video or playlist URL without downloading
    Probe { url: String },

    /// Download a URL (every entry by default)
    Download {
        url: String,

        /// Format id applied to every downloaded video
        #[arg(long)]
        format_id: Option<String>,

        /// 1-based entry indices to download (defaults to all entries)
        #[arg(long, value_delimiter = ',')]
        select: Vec<usize>,
    },

    /// Delete all files in the download folder
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut settings = AppSettings::default();
    if let Some(dir) = cli.output_dir {
        settings.download_dir = dir;
    }

    match cli.command {
        Command::Probe { url } => probe(&url, settings).await,
        Command::Download {
            url,
            format_id,
            select,
        } => download(&url, format_id, select, settings).await,
        Command::Clean => clean(settings).await,
    }
}

async fn probe(url: &str, settings: AppSettings) -> Result<()> {
    let show_thumbnails = settings.show_thumbnails;
    let source = YtDlpSource::with_settings(settings)?;
    let videos = CatalogBuilder::new(&source).build(url).await?;

    if videos.is_empty() {
        println!("No extractable videos found");
        return Ok(());
    }

    let client = reqwest::Client::new();
    println!("Found {} video(s)\n", videos.len());
    for (i, video) in videos.iter().enumerate() {
        print_video(i + 1, video);
        if show_thumbnails {
            if let Some(thumbnail_url) = &video.thumbnail_url {
                // Degrades to a note; a missing thumbnail is never fatal
                match fetch_thumbnail(&client, thumbnail_url).await {
                    Ok(bytes) => {
                        println!("    thumbnail: {} ({})\n", thumbnail_url, human_size(bytes.len() as u64))
                    }
                    Err(e) => println!("    thumbnail unavailable: {}\n", e),
                }
            }
        }
    }

    let total = total_download_size(&videos, &Default::default());
    println!("Total size (best quality): {}", human_size(total));
    Ok(())
}

fn print_video(index: usize, video: &VideoRecord) {
    println!("[{}] {}", index, video.title);
    println!("    url:      {}", video.source_url);
    println!("    duration: {}", video.duration_display());
    println!(
        "    views: {}  likes: {}",
        video.view_count, video.like_count
    );
    println!("    formats:");
    for format in &video.formats {
        println!(
            "      {:>8}  {:>5}  {:>10}  {}",
            format.format_id,
            format.ext,
            format.resolution,
            human_size(format.filesize_bytes)
        );
    }
    println!();
}

async fn download(
    url: &str,
    format_id: Option<String>,
    select: Vec<usize>,
    settings: AppSettings,
) -> Result<()> {
    let folder = DownloadFolder::new(settings.download_dir.clone());
    let merge_format = settings.merge_format.clone();
    let source = YtDlpSource::with_settings(settings)?;

    let videos = CatalogBuilder::new(&source).build(url).await?;
    if videos.is_empty() {
        println!("No extractable videos found");
        return Ok(());
    }

    let mut selection = SelectionState::new();
    if select.is_empty() {
        selection.select_all(&videos);
    } else {
        let applied = selection.select_indices(&videos, &select);
        if applied < select.len() {
            println!("Ignored {} out-of-range index(es)", select.len() - applied);
        }
    }
    if let Some(format_id) = &format_id {
        for video in &videos {
            if selection.is_selected(&video.source_url) {
                selection.set_format(&video.source_url, format_id);
            }
        }
    }

    let selected = selection.selected_videos(&videos);
    let total = total_download_size(selected.iter().copied(), selection.format_by_url());
    println!(
        "Downloading {} video(s), about {}",
        selected.len(),
        human_size(total)
    );

    let mut orchestrator = DownloadOrchestrator::new(&source, folder, &merge_format);
    let mut history = DownloadHistory::new();

    let results = orchestrator
        .download_batch(&selected, &selection, |source_url, fraction| {
            print!("\r{}: {:.1}%", source_url, fraction * 100.0);
            let _ = std::io::stdout().flush();
        })
        .await;

    println!();
    for result in results {
        match (&result.local_path, &result.error) {
            (Some(path), _) => println!("saved {} -> {}", result.source_url, path.display()),
            (None, Some(error)) => println!("FAILED {} ({})", result.source_url, error),
            (None, None) => println!("FAILED {}", result.source_url),
        }
        history.record(result);
    }

    println!(
        "{}/{} downloads succeeded",
        history.successes(),
        history.len()
    );
    Ok(())
}

async fn clean(settings: AppSettings) -> Result<()> {
    let folder = DownloadFolder::new(settings.download_dir);
    let removed = folder.clear().await?;
    println!("Removed {} file(s) from {}", removed, folder.dir().display());
    Ok(())
}
