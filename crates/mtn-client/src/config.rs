//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an explicit mtn binary.
pub const ENV_MTN_PATH: &str = "MTN_PATH";
/// Environment variable enabling a per-invocation timeout, in seconds.
pub const ENV_MTN_TIMEOUT_SECS: &str = "MTN_TIMEOUT_SECS";

/// Thumbnailer configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailerConfig {
    /// Explicit mtn binary. Auto-detected when unset.
    pub binary_path: Option<PathBuf>,
    /// Kill mtn after this long. No limit when unset.
    pub timeout: Option<Duration>,
}

impl ThumbnailerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            binary_path: lookup(ENV_MTN_PATH)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            timeout: lookup(ENV_MTN_TIMEOUT_SECS)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}
