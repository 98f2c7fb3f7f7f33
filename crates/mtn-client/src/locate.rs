//! mtn binary discovery.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Executable name used for `PATH` lookups and as the last-resort fallback.
pub const MTN_BINARY_NAME: &str = "mtn";

/// Well-known install locations, checked after the executable-relative one.
const SYSTEM_CANDIDATES: &[&str] = &["/usr/local/bin/mtn", "/usr/bin/mtn", "./bin/mtn", "mtn"];

/// Resolve the mtn binary to launch.
///
/// An explicit path always wins and is not checked. Otherwise the first
/// existing candidate is used, then a `PATH` lookup, and finally the bare
/// name so that a missing binary surfaces as a launch failure later on.
pub fn locate_binary(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let found = candidate_paths()
        .into_iter()
        .find(|candidate| candidate.is_file())
        .or_else(|| which::which(MTN_BINARY_NAME).ok());

    match found {
        Some(path) => {
            debug!("Using mtn binary at {}", path.display());
            path
        }
        None => {
            debug!("mtn binary not found, deferring to launch-time resolution");
            PathBuf::from(MTN_BINARY_NAME)
        }
    }
}

/// Ordered list of on-disk locations probed for the binary.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(SYSTEM_CANDIDATES.len() + 1);

    // <install prefix>/bin/mtn next to the running executable
    if let Some(prefix) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf))
    {
        candidates.push(prefix.join("bin").join(MTN_BINARY_NAME));
    }

    candidates.extend(SYSTEM_CANDIDATES.iter().map(PathBuf::from));
    candidates
}
