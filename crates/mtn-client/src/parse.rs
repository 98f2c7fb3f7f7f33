//! Scraping of mtn's human-readable output.
//!
//! mtn has no machine-readable progress or info mode, so everything here is
//! pattern matching against its log text. A miss is never an error, the
//! corresponding event or field is simply absent.

use regex::Regex;
use std::sync::LazyLock;

use mtn_models::{ShotProgress, VideoMetadata};

/// Version reported when the banner can't be found.
pub const UNKNOWN_VERSION: &str = "unknown";

static SHOT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"shot (\d+):").unwrap());
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+) s.*?(\d+\.\d+) shots/s").unwrap());
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Movie Thumbnailer \(mtn\) ([\d.]+)").unwrap());

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"duration: (\d+\.\d+) s").unwrap());
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Size: (\d+) bytes").unwrap());
static DIMENSIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Video:.*?, (\d+)x(\d+)").unwrap());
static VIDEO_CODEC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Video: ([^,]+)").unwrap());
static AUDIO_CODEC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Audio: ([^,]+)").unwrap());
static FPS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+\.\d+) fps").unwrap());
static BITRATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"bitrate: (\d+) kb/s").unwrap());

/// Turns mtn output into structured data.
///
/// Swap the implementation with `Thumbnailer::with_parser` if mtn ever grows
/// a structured output mode.
pub trait OutputParser: Send + Sync + std::fmt::Debug {
    /// Progress events found in a freshly read chunk of stdout.
    fn parse_progress(&self, chunk: &str) -> Vec<ShotProgress>;

    /// Metadata from the full stderr of a `-v -i` run.
    fn parse_metadata(&self, output: &str) -> VideoMetadata;

    /// Version number from the banner, if present.
    fn parse_version(&self, output: &str) -> Option<String>;
}

/// Regex based parser for mtn's log format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOutputParser;

impl OutputParser for TextOutputParser {
    fn parse_progress(&self, chunk: &str) -> Vec<ShotProgress> {
        let mut events = Vec::new();

        if let Some(shot) = capture::<u32>(&SHOT_RE, chunk) {
            events.push(ShotProgress::shot(shot));
        }

        if let Some(time) = capture::<f64>(&TIME_RE, chunk) {
            events.push(ShotProgress::time(time));
        }

        events
    }

    fn parse_metadata(&self, output: &str) -> VideoMetadata {
        let (width, height) = DIMENSIONS_RE
            .captures(output)
            .map(|caps| (caps[1].parse().ok(), caps[2].parse().ok()))
            .unwrap_or((None, None));

        VideoMetadata {
            duration: capture(&DURATION_RE, output),
            width,
            height,
            codec: capture_text(&VIDEO_CODEC_RE, output),
            audio_codec: capture_text(&AUDIO_CODEC_RE, output),
            frame_rate: capture(&FPS_RE, output),
            bitrate: capture(&BITRATE_RE, output),
            size: capture(&SIZE_RE, output),
        }
    }

    fn parse_version(&self, output: &str) -> Option<String> {
        capture_text(&VERSION_RE, output)
    }
}

/// First capture group of the first match, parsed.
fn capture<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// First capture group of the first match, trimmed.
fn capture_text(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str().trim();
    Some(value.to_string())
}
