//! Thumbnail generation options.
//!
//! Every field maps onto one mtn command-line flag. A missing field means the
//! flag is not passed and mtn falls back to its own default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default contact sheet suffix used by mtn when `-o` is not given.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_s.jpg";
/// Suffix mtn appends to the base name of an extracted cover image.
pub const COVER_SUFFIX: &str = "_cover.jpg";
/// Extension of the WebVTT file written by `--vtt`.
pub const WEBVTT_EXTENSION: &str = ".vtt";

/// Options for a single mtn invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ThumbnailOptions {
    // ---- Output ----
    /// Output directory (`-O`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    /// Output suffix including extension (`-o`), e.g. `_preview.jpg`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_suffix: Option<String>,
    /// Keep the full input file name, extension included (`-X`)
    pub use_full_filename: bool,
    /// Custom output file name base (`-x`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_filename: Option<String>,
    /// Don't overwrite existing files (`-W`)
    pub no_overwrite: bool,

    // ---- Grid ----
    /// Number of columns (`-c`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    /// Number of rows (`-r`), 0 lets mtn compute it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    /// Seconds between shots (`-s`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    /// Minimum shot height in pixels (`-h`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    /// Output image width (`-w`), 0 means columns * movie width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Gap between shots in pixels (`-g`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,

    // ---- Appearance ----
    /// Font file for text overlays (`-f`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Background color as hex, e.g. `FFFFFF` (`-k`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// JPEG quality 1-100 (`-j`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jpeg_quality: Option<u32>,
    /// Show the info header. Only `Some(false)` is passed on (`-i`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_info: Option<bool>,
    /// Show shot timestamps. Only `Some(false)` is passed on (`-t`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_timestamp: Option<bool>,
    /// Additional text above the image (`-T`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_text: Option<String>,
    /// Draw shadows beneath shots (`--shadow`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Transparent background, PNG output only (`--transparent`)
    pub transparent: bool,

    // ---- Detection ----
    /// Edge detection level, 0 is off (`-D`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_detection: Option<u32>,
    /// Blank frame threshold 0-1 (`-b`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_threshold: Option<f64>,

    // ---- Timing ----
    /// Seconds skipped at the beginning (`-B`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_beginning: Option<f64>,
    /// Seconds skipped at the end (`-E`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_end: Option<f64>,
    /// Treat the movie as N seconds long (`-C`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_duration: Option<f64>,

    // ---- Streams ----
    /// Video stream index (`-S`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_stream: Option<u32>,

    // ---- Modes ----
    /// Verbose mode (`-v`)
    pub verbose: bool,
    /// Quiet mode (`-q`)
    pub quiet: bool,
    /// Always seek (`-z`)
    pub seek_mode: bool,
    /// Never seek (`-Z`)
    pub non_seek_mode: bool,

    // ---- Advanced ----
    /// Aspect ratio override, e.g. 1.3333 (`-a`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    /// Extract embedded cover art (`--cover`)
    pub extract_cover: bool,
    /// WebVTT image prefix (`--vtt`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_vtt: Option<String>,
    /// FFmpeg filter chain (`--filters`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
    /// Tonemap HDR movies (`--tonemap`)
    pub tonemap: bool,

    // ---- Directory ----
    /// Recursion depth when the input is a directory (`-d`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<i32>,
    /// File extensions processed in directory mode (`-e`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,

    // ---- Individual shots ----
    /// Save individual shots (`-I`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_individual: Option<IndividualShots>,
    /// Info text file suffix (`-N`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_suffix: Option<String>,
}

impl ThumbnailOptions {
    /// Parse options from a JSON document. Unknown fields are ignored and
    /// missing fields are left unset.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Shadow setting.
///
/// Deserializes from either a number (radius) or a boolean. `true` turns
/// shadows on with mtn's default radius, `false` leaves them off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Shadow {
    /// Explicit shadow radius
    Radius(u32),
    /// Toggle using mtn's default radius
    Enabled(bool),
}

/// Which individual shot files mtn should write next to the contact sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IndividualShots {
    /// Thumbnail sized shots (`t`)
    pub thumbnail: bool,
    /// Original sized shots (`o`)
    pub original: bool,
    /// Skip the grid image entirely (`i`)
    pub ignore_grid: bool,
}

impl IndividualShots {
    /// One-letter codes for the enabled capabilities, in mtn's fixed order.
    pub fn codes(&self) -> String {
        let mut codes = String::new();
        if self.thumbnail {
            codes.push('t');
        }
        if self.original {
            codes.push('o');
        }
        if self.ignore_grid {
            codes.push('i');
        }
        codes
    }

    /// Whether any capability is enabled.
    pub fn any(&self) -> bool {
        self.thumbnail || self.original || self.ignore_grid
    }
}
