//! Shared data models for the mtn thumbnailer client.
//!
//! This crate provides Serde-serializable types for:
//! - Thumbnail generation options
//! - Progress snapshots
//! - Generation results
//! - Video metadata

pub mod metadata;
pub mod options;
pub mod progress;
pub mod result;

// Re-export common types
pub use metadata::VideoMetadata;
pub use options::{
    IndividualShots, Shadow, ThumbnailOptions, COVER_SUFFIX, DEFAULT_OUTPUT_SUFFIX,
    WEBVTT_EXTENSION,
};
pub use progress::ShotProgress;
pub use result::{ThumbnailResult, EXIT_CODE_NOT_RUN};
