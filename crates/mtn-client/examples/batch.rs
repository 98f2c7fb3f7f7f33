//! Generate contact sheets for every video in a directory.
//!
//! Usage: cargo run --example batch -- <video dir> [options.json]

use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mtn_client::{ThumbnailOptions, Thumbnailer, ThumbnailerConfig};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm", "wmv"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let video_dir = PathBuf::from(args.next().unwrap_or_else(|| "./videos".to_string()));

    let opts = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading options from {}", path))?;
            ThumbnailOptions::from_json(&json).context("parsing options")?
        }
        None => ThumbnailOptions {
            columns: Some(3),
            rows: Some(2),
            min_height: Some(150),
            output_dir: Some("./thumbnails".to_string()),
            ..Default::default()
        },
    };

    let mut videos: Vec<PathBuf> = std::fs::read_dir(&video_dir)
        .with_context(|| format!("reading {}", video_dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    videos.sort();

    if videos.is_empty() {
        info!("No video files found in {}", video_dir.display());
        return Ok(());
    }
    info!("Found {} video files", videos.len());

    let mtn = Thumbnailer::from_config(&ThumbnailerConfig::from_env());
    let results = mtn
        .generate_batch(&videos, &opts, |path, progress| {
            info!(
                "{}: shot {} (~{} total)",
                path.display(),
                progress.current_shot,
                progress.total_shots
            );
        })
        .await;

    for (video, result) in videos.iter().zip(&results) {
        match (&result.output_path, result.success) {
            (Some(sheet), true) => info!(
                "{} -> {} ({} ms)",
                video.display(),
                sheet.display(),
                result.execution_time_ms
            ),
            _ => warn!(
                "{} failed: {}",
                video.display(),
                result.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    let failed = results.iter().filter(|r| !r.success).count();
    info!("Done: {} ok, {} failed", results.len() - failed, failed);
    Ok(())
}
