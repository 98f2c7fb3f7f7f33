//! mtn (Movie Thumbnailer) CLI wrapper.
//!
//! This crate provides:
//! - Type-safe mtn command building from [`ThumbnailOptions`]
//! - Progress scraping from mtn's stdout
//! - Contact sheet generation, single and batched
//! - Metadata, availability and version probes
//! - Optional timeout and cancellation via tokio
//!
//! ```ignore
//! use mtn_client::{Thumbnailer, ThumbnailOptions};
//!
//! let mtn = Thumbnailer::new();
//! let opts = ThumbnailOptions { columns: Some(4), ..Default::default() };
//! let result = mtn.generate("movie.mkv", &opts).await;
//! println!("{:?}", result.output_path);
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod locate;
pub mod parse;
pub mod paths;
pub mod process;

pub use client::{is_available_exit_code, is_success_exit_code, Thumbnailer, EXIT_CODE_NO_INPUT};
pub use command::{build_arguments, MtnCommand};
pub use config::ThumbnailerConfig;
pub use error::{MtnError, MtnResult};
pub use locate::locate_binary;
pub use parse::{OutputParser, TextOutputParser, UNKNOWN_VERSION};
pub use paths::{output_path, resolve_output_paths, OutputPaths};
pub use process::{CapturedOutput, MtnRunner};

// Model re-exports
pub use mtn_models::{
    IndividualShots, Shadow, ShotProgress, ThumbnailOptions, ThumbnailResult, VideoMetadata,
};
