//! Generate a single contact sheet.
//!
//! Usage: cargo run --example basic -- <video>

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mtn_client::{Shadow, ThumbnailOptions, Thumbnailer, ThumbnailerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let video = std::env::args()
        .nth(1)
        .context("usage: basic <video>")?;

    let mtn = Thumbnailer::from_config(&ThumbnailerConfig::from_env());
    if !mtn.check_availability().await {
        bail!("mtn not found at {}", mtn.binary_path().display());
    }
    info!("mtn version {}", mtn.version().await);

    let meta = mtn.video_metadata(&video).await;
    info!("Metadata: {:?}", meta);

    let opts = ThumbnailOptions {
        columns: Some(4),
        rows: Some(4),
        min_height: Some(200),
        jpeg_quality: Some(92),
        shadow: Some(Shadow::Enabled(true)),
        output_suffix: Some("_preview.jpg".to_string()),
        ..Default::default()
    };

    let result = mtn
        .generate_with_progress(&video, &opts, |progress| {
            if let Some(time) = progress.current_time {
                info!("at {:.1}s", time);
            } else {
                info!("shot {}", progress.current_shot);
            }
        })
        .await;

    if !result.success {
        bail!(
            "mtn failed (exit code {}): {}",
            result.exit_code,
            result.error.unwrap_or_default()
        );
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(env_filter)
            .init();
    }
}
