//! Progress snapshots scraped from mtn output.

use serde::{Deserialize, Serialize};

/// Best-effort progress information for an in-flight generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotProgress {
    /// Index of the shot mtn is currently working on
    pub current_shot: u32,
    /// Approximate total. mtn does not announce the real count, so this is
    /// `current_shot + 1` for shot events and 0 otherwise.
    pub total_shots: u32,
    /// Completion percentage. mtn does not report one; always 0.
    pub percentage: f64,
    /// Timestamp in the movie, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_time: Option<f64>,
}

impl ShotProgress {
    /// Event for a `shot N:` marker.
    pub fn shot(current_shot: u32) -> Self {
        Self {
            current_shot,
            total_shots: current_shot.saturating_add(1),
            ..Default::default()
        }
    }

    /// Event for a `<seconds> s ... shots/s` marker.
    pub fn time(current_time: f64) -> Self {
        Self {
            current_time: Some(current_time),
            ..Default::default()
        }
    }

    /// Always true: `total_shots` is a guess, not mtn's real shot count.
    pub fn is_estimate(&self) -> bool {
        true
    }
}
