//! yt-notes - A Rust CLI tool for turning YouTube videos into detailed notes
//!
//! This library extracts the caption transcript of a YouTube video and feeds it
//! to Google's Gemini generative-language API to produce a bounded-length
//! summary with key points.

pub mod cli;
pub mod config;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod summarize;
pub mod transcript;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use pipeline::{NotesDocument, NotesPipeline};
pub use resolver::VideoId;
pub use transcript::{CaptionFragment, Transcript};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error categories for the three pipeline stages plus configuration.
///
/// Every external-call boundary folds its failures into exactly one of these
/// variants, so the CLI layer can render all stages the same way.
#[derive(thiserror::Error, Debug)]
pub enum NotesError {
    #[error("Unsupported URL format: {0}")]
    UnsupportedUrl(String),

    #[error(
        "Could not retrieve a transcript for video '{video_id}'. Possible reasons: \
         subtitles are disabled for this video, the video is private or unavailable, \
         or the video is region-locked. Technical error: {detail}"
    )]
    TranscriptUnavailable { video_id: String, detail: String },

    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
