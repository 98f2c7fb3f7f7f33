//! Outcome of a thumbnail generation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Exit code recorded when mtn never ran (missing input, launch failure,
/// timeout or cancellation).
pub const EXIT_CODE_NOT_RUN: i32 = -1;

/// Result of one mtn invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailResult {
    /// Whether mtn exited with 0 (success) or 1 (success with warnings)
    pub success: bool,
    /// Expected contact sheet path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Info text file, if mtn wrote one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_path: Option<PathBuf>,
    /// Extracted cover image, if mtn wrote one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<PathBuf>,
    /// Individual shot images found next to the contact sheet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_shots: Option<Vec<PathBuf>>,
    /// WebVTT file, if mtn wrote one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_vtt_path: Option<PathBuf>,
    /// Wall-clock time of the invocation in milliseconds
    pub execution_time_ms: u64,
    /// stdout followed by stderr
    pub output: String,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Process exit code, -1 when mtn never ran
    pub exit_code: i32,
}

impl ThumbnailResult {
    /// Failure result for an invocation that never produced an exit status.
    pub fn failure(error: impl Into<String>, output: String, execution_time_ms: u64) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            output,
            execution_time_ms,
            exit_code: EXIT_CODE_NOT_RUN,
            ..Default::default()
        }
    }
}
