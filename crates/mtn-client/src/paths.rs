//! Output file naming.
//!
//! The contact sheet path is computed from the input path and options the same
//! way mtn names it. Side files (info, cover, WebVTT, individual shots) depend
//! on what mtn actually decided to write, so they are only reported when they
//! exist on disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use mtn_models::{ThumbnailOptions, COVER_SUFFIX, DEFAULT_OUTPUT_SUFFIX, WEBVTT_EXTENSION};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Paths derived for one generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputPaths {
    pub output_path: PathBuf,
    pub info_path: Option<PathBuf>,
    pub cover_path: Option<PathBuf>,
    pub web_vtt_path: Option<PathBuf>,
    pub individual_shots: Option<Vec<PathBuf>>,
}

/// Base path that mtn appends its suffixes to.
///
/// With an output directory only the file name of the input is kept. Unless
/// `use_full_filename` is set the last extension of the file name is dropped.
/// A dotfile such as `dir/.hidden` has no extension and keeps its full name
/// (`dir/.hidden_s.jpg`), where cutting at the last dot would give `dir/_s.jpg`.
pub fn base_path(video_path: &Path, opts: &ThumbnailOptions) -> PathBuf {
    let mut base = match opts.output_dir.as_deref().filter(|dir| !dir.is_empty()) {
        Some(dir) => match video_path.file_name() {
            Some(name) => Path::new(dir).join(name),
            None => Path::new(dir).join(video_path),
        },
        None => video_path.to_path_buf(),
    };

    if !opts.use_full_filename && base.extension().is_some() {
        base.set_extension("");
    }

    base
}

/// Expected contact sheet path. The file doesn't have to exist.
pub fn output_path(video_path: &Path, opts: &ThumbnailOptions) -> PathBuf {
    let suffix = opts
        .output_suffix
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_OUTPUT_SUFFIX);
    with_suffix(&base_path(video_path, opts), suffix)
}

/// Contact sheet path plus whichever side files mtn left behind.
pub fn resolve_output_paths(video_path: &Path, opts: &ThumbnailOptions) -> OutputPaths {
    let base = base_path(video_path, opts);
    let output_path = output_path(video_path, opts);

    let info_path = opts
        .info_suffix
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|suffix| with_suffix(&base, suffix))
        .filter(|p| p.exists());

    let cover_path = opts
        .extract_cover
        .then(|| with_suffix(&base, COVER_SUFFIX))
        .filter(|p| p.exists());

    let web_vtt_path = opts
        .web_vtt
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|_| with_suffix(&base, WEBVTT_EXTENSION))
        .filter(|p| p.exists());

    let cover_name = with_suffix(&base, COVER_SUFFIX);
    let individual_shots = opts
        .save_individual
        .filter(|shots| shots.any())
        .map(|_| find_individual_shots(&base, &[output_path.as_path(), cover_name.as_path()]))
        .filter(|shots| !shots.is_empty());

    OutputPaths {
        output_path,
        info_path,
        cover_path,
        web_vtt_path,
        individual_shots,
    }
}

/// Append a raw suffix to a path. Unlike `set_extension` this keeps any
/// existing dots and allows suffixes such as `_s.jpg`.
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path: OsString = base.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

/// Image files next to `base` named `<base name>_*`, sorted by name.
fn find_individual_shots(base: &Path, exclude: &[&Path]) -> Vec<PathBuf> {
    let Some(stem) = base.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Vec::new();
    };
    let prefix = format!("{stem}_");
    let dir = match base.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut shots: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
        .map(|entry| dir.join(entry.file_name()))
        .filter(|path| is_image(path))
        .filter(|path| !exclude.iter().any(|excluded| excluded == path))
        .collect();

    shots.sort();
    shots
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}
