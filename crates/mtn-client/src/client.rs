//! Thumbnailer client: contact sheet generation and mtn probes.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use mtn_models::{ShotProgress, ThumbnailOptions, ThumbnailResult, VideoMetadata};

use crate::command::{build_arguments, metadata_arguments, version_arguments};
use crate::config::ThumbnailerConfig;
use crate::error::{MtnError, MtnResult};
use crate::locate::locate_binary;
use crate::parse::{OutputParser, TextOutputParser, UNKNOWN_VERSION};
use crate::paths::resolve_output_paths;
use crate::process::{CapturedOutput, MtnRunner};

/// Exit code of `mtn -v` when it ran but had no input file.
pub const EXIT_CODE_NO_INPUT: i32 = 255;

/// Whether an exit code from `mtn -v` means the binary is usable.
pub fn is_available_exit_code(code: Option<i32>) -> bool {
    matches!(code, Some(0 | 1 | EXIT_CODE_NO_INPUT))
}

/// Whether a generation exit code counts as success (1 is "done with
/// warnings").
pub fn is_success_exit_code(code: Option<i32>) -> bool {
    matches!(code, Some(0 | 1))
}

/// Client for the mtn binary.
///
/// Every operation resolves to a value: launch problems, missing inputs and
/// failing exits come back as failure results, empty metadata, `false` or
/// `"unknown"`.
#[derive(Debug)]
pub struct Thumbnailer {
    binary: PathBuf,
    parser: Box<dyn OutputParser>,
    runner: MtnRunner,
}

impl Default for Thumbnailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Thumbnailer {
    /// Create a thumbnailer using an auto-detected mtn binary.
    pub fn new() -> Self {
        Self::from_binary(locate_binary(None))
    }

    /// Create a thumbnailer for an explicit mtn binary.
    pub fn with_binary(binary: impl AsRef<Path>) -> Self {
        Self::from_binary(locate_binary(Some(binary.as_ref())))
    }

    /// Create a thumbnailer from configuration.
    pub fn from_config(config: &ThumbnailerConfig) -> Self {
        let mut thumbnailer = Self::from_binary(locate_binary(config.binary_path.as_deref()));
        if let Some(timeout) = config.timeout {
            thumbnailer = thumbnailer.with_timeout(timeout);
        }
        thumbnailer
    }

    fn from_binary(binary: PathBuf) -> Self {
        Self {
            binary,
            parser: Box::new(TextOutputParser),
            runner: MtnRunner::new(),
        }
    }

    /// Replace the output parser.
    pub fn with_parser(mut self, parser: impl OutputParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Kill mtn runs that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.runner = self.runner.with_timeout(timeout);
        self
    }

    /// Kill in-flight runs once the signal turns `true`.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.runner = self.runner.with_cancel(cancel_rx);
        self
    }

    /// Binary that will be launched.
    pub fn binary_path(&self) -> &Path {
        &self.binary
    }

    /// Generate a contact sheet.
    pub async fn generate(
        &self,
        video_path: impl AsRef<Path>,
        opts: &ThumbnailOptions,
    ) -> ThumbnailResult {
        self.generate_with_progress(video_path, opts, |_| {}).await
    }

    /// Generate a contact sheet, reporting progress as mtn prints it.
    ///
    /// `on_progress` may be called any number of times and never after this
    /// function returns.
    pub async fn generate_with_progress<F>(
        &self,
        video_path: impl AsRef<Path>,
        opts: &ThumbnailOptions,
        mut on_progress: F,
    ) -> ThumbnailResult
    where
        F: FnMut(ShotProgress) + Send,
    {
        let started = Instant::now();
        let video_path = video_path.as_ref();
        let mut captured = CapturedOutput::default();

        let outcome = self
            .try_generate(video_path, opts, &mut captured, &mut on_progress)
            .await;
        let execution_time_ms = elapsed_ms(started);

        let code = match outcome {
            Ok(code) => code,
            Err(err) => {
                warn!("mtn generation failed for {}: {}", video_path.display(), err);
                return ThumbnailResult::failure(
                    err.to_string(),
                    captured.combined(),
                    execution_time_ms,
                );
            }
        };

        let success = is_success_exit_code(code);
        let exit_code = code.unwrap_or(0);
        let error = match code {
            _ if success => None,
            Some(code) => Some(format!("mtn exited with code {}", code)),
            None => Some("mtn was terminated by a signal".to_string()),
        };

        if success {
            info!(
                "mtn finished {} in {} ms (exit code {})",
                video_path.display(),
                execution_time_ms,
                exit_code
            );
        } else {
            warn!(
                "mtn failed on {} after {} ms: {}",
                video_path.display(),
                execution_time_ms,
                error.as_deref().unwrap_or_default()
            );
        }

        let paths = resolve_output_paths(video_path, opts);

        ThumbnailResult {
            success,
            output_path: Some(paths.output_path),
            info_path: paths.info_path,
            cover_path: paths.cover_path,
            individual_shots: paths.individual_shots,
            web_vtt_path: paths.web_vtt_path,
            execution_time_ms,
            output: captured.combined(),
            error,
            exit_code,
        }
    }

    async fn try_generate<F>(
        &self,
        video_path: &Path,
        opts: &ThumbnailOptions,
        captured: &mut CapturedOutput,
        on_progress: &mut F,
    ) -> MtnResult<Option<i32>>
    where
        F: FnMut(ShotProgress) + Send,
    {
        if !fs::try_exists(video_path).await.unwrap_or(false) {
            return Err(MtnError::FileNotFound(video_path.to_path_buf()));
        }

        if let Some(dir) = opts.output_dir.as_deref().filter(|dir| !dir.is_empty()) {
            if !Path::new(dir).exists() {
                debug!("Creating output directory {}", dir);
                fs::create_dir_all(dir)
                    .await
                    .map_err(|e| MtnError::output_dir(dir, e))?;
            }
        }

        let args = build_arguments(video_path, opts);
        let parser = self.parser.as_ref();

        self.runner
            .run(&self.binary, &args, captured, |chunk| {
                for event in parser.parse_progress(chunk) {
                    on_progress(event);
                }
            })
            .await
    }

    /// Generate contact sheets one video after another.
    ///
    /// Returns one result per input, in input order. A failing video doesn't
    /// stop the rest.
    pub async fn generate_batch<P, F>(
        &self,
        video_paths: &[P],
        opts: &ThumbnailOptions,
        mut on_progress: F,
    ) -> Vec<ThumbnailResult>
    where
        P: AsRef<Path> + Sync,
        F: FnMut(&Path, ShotProgress) + Send,
    {
        let mut results = Vec::with_capacity(video_paths.len());

        for (index, video_path) in video_paths.iter().enumerate() {
            let video_path = video_path.as_ref();
            debug!(
                "Batch item {}/{}: {}",
                index + 1,
                video_paths.len(),
                video_path.display()
            );

            let result = self
                .generate_with_progress(video_path, opts, |progress| {
                    on_progress(video_path, progress)
                })
                .await;
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.success).count();
        info!(
            "mtn batch finished: {} succeeded, {} failed",
            results.len() - failed,
            failed
        );

        results
    }

    /// Read video metadata from mtn's verbose output.
    ///
    /// Fields mtn didn't print are left empty; a launch failure yields an
    /// empty record.
    pub async fn video_metadata(&self, video_path: impl AsRef<Path>) -> VideoMetadata {
        match self.capture(&metadata_arguments(video_path)).await {
            Ok((_, captured)) => self.parser.parse_metadata(&captured.stderr),
            Err(err) => {
                warn!("mtn metadata query failed: {}", err);
                VideoMetadata::default()
            }
        }
    }

    /// Check whether mtn can be launched.
    pub async fn check_availability(&self) -> bool {
        match self.capture(&version_arguments()).await {
            Ok((code, _)) => is_available_exit_code(code),
            Err(err) => {
                debug!("mtn not available: {}", err);
                false
            }
        }
    }

    /// mtn version from its banner, or `"unknown"`.
    pub async fn version(&self) -> String {
        let version = match self.capture(&version_arguments()).await {
            Ok((_, captured)) => self.parser.parse_version(&captured.stderr),
            Err(err) => {
                debug!("mtn version query failed: {}", err);
                None
            }
        };
        version.unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }

    /// Run a metadata, availability or version query. These ignore the
    /// cancellation signal so a cancelled client can still be inspected.
    async fn capture(&self, args: &[String]) -> MtnResult<(Option<i32>, CapturedOutput)> {
        let mut captured = CapturedOutput::default();
        let code = self
            .runner
            .without_cancel()
            .run(&self.binary, args, &mut captured, |_| {})
            .await?;
        Ok((code, captured))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtn_models::EXIT_CODE_NOT_RUN;

    #[test]
    fn test_success_exit_codes() {
        assert!(is_success_exit_code(Some(0)));
        assert!(is_success_exit_code(Some(1)));
        assert!(!is_success_exit_code(Some(2)));
        assert!(!is_success_exit_code(Some(255)));
        assert!(!is_success_exit_code(None));
    }

    #[test]
    fn test_availability_exit_codes() {
        assert!(is_available_exit_code(Some(0)));
        assert!(is_available_exit_code(Some(1)));
        assert!(is_available_exit_code(Some(255)));
        assert!(!is_available_exit_code(Some(2)));
        assert!(!is_available_exit_code(Some(-1)));
        assert!(!is_available_exit_code(None));
    }

    #[test]
    fn test_explicit_binary() {
        let thumbnailer = Thumbnailer::with_binary("/custom/path/mtn");
        assert_eq!(thumbnailer.binary_path(), Path::new("/custom/path/mtn"));
    }

    #[tokio::test]
    async fn test_missing_video_is_not_launched() {
        // A binary that can't exist proves nothing was spawned: a launch
        // attempt would report "Failed to execute mtn" instead.
        let thumbnailer = Thumbnailer::with_binary("/nonexistent/bin/mtn");
        let mut calls = 0;
        let result = thumbnailer
            .generate_with_progress(
                "/non/existent/file.mp4",
                &ThumbnailOptions::default(),
                |_| calls += 1,
            )
            .await;

        assert!(!result.success);
        assert_eq!(result.exit_code, EXIT_CODE_NOT_RUN);
        assert_eq!(
            result.error.as_deref(),
            Some("Video file not found: /non/existent/file.mp4")
        );
        assert!(result.output.is_empty());
        assert!(result.output_path.is_none());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(&video, b"not really a video").unwrap();

        let thumbnailer = Thumbnailer::with_binary(dir.path().join("missing-mtn"));
        let result = thumbnailer.generate(&video, &ThumbnailOptions::default()).await;

        assert!(!result.success);
        assert_eq!(result.exit_code, EXIT_CODE_NOT_RUN);
        assert!(result.output.is_empty());
        assert!(result
            .error
            .as_deref()
            .unwrap_or_default()
            .starts_with("Failed to execute mtn:"));
    }

    #[tokio::test]
    async fn test_probes_without_binary() {
        let thumbnailer = Thumbnailer::with_binary("/nonexistent/bin/mtn");
        assert!(!thumbnailer.check_availability().await);
        assert_eq!(thumbnailer.version().await, UNKNOWN_VERSION);
        assert!(thumbnailer.video_metadata("/test.mp4").await.is_empty());
    }
}
