//! Error types for mtn invocations.
//!
//! These never reach callers of the public `Thumbnailer` operations; they are
//! folded into failure results there.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for mtn operations.
pub type MtnResult<T> = Result<T, MtnError>;

/// Errors that can occur while running mtn.
#[derive(Debug, Error)]
pub enum MtnError {
    #[error("Video file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to execute mtn: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mtn timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("mtn run cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MtnError {
    /// Create a launch failure error.
    pub fn spawn(source: std::io::Error) -> Self {
        Self::Spawn(source)
    }

    /// Create an output directory failure error.
    pub fn output_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputDir {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MtnError::FileNotFound(PathBuf::from("/no/such/clip.mp4"));
        assert_eq!(err.to_string(), "Video file not found: /no/such/clip.mp4");

        let err = MtnError::spawn(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "No such file or directory",
        ));
        assert!(err.to_string().starts_with("Failed to execute mtn:"));

        assert_eq!(
            MtnError::Timeout(Duration::from_secs(30)).to_string(),
            "mtn timed out after 30000 ms"
        );
    }

    #[test]
    fn test_subsecond_timeout_message() {
        assert_eq!(
            MtnError::Timeout(Duration::from_millis(500)).to_string(),
            "mtn timed out after 500 ms"
        );
    }
}
