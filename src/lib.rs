//! tubescript - fetch timestamped YouTube transcripts from a web form or the command line
//!
//! The crate resolves a video identifier from free-form input, asks a
//! [`sources::TranscriptSource`] for the caption tracks of that video and
//! renders the chosen track as `MM:SS text` lines.

pub mod cli;
pub mod config;
pub mod output;
pub mod resolver;
pub mod server;
pub mod sources;
pub mod transcript;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use resolver::{resolve, VideoId};
pub use sources::{CaptionEntry, LanguageOption, TrackInfo, TranscriptSource};
pub use transcript::{TrackListing, TranscriptOutcome, TranscriptPipeline};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Every way a transcript request can fail
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    #[error("Invalid YouTube URL or ID: {0:?}")]
    InvalidIdentifier(String),

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No transcript found for video {video_id} (language: {language})")]
    NoTranscriptFound { video_id: String, language: String },

    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("{0}")]
    Unexpected(String),
}

impl TranscriptError {
    /// Message shown to the person who submitted the request
    pub fn user_message(&self) -> String {
        match self {
            TranscriptError::InvalidIdentifier(_) => "Invalid YouTube URL or ID.".to_string(),
            TranscriptError::TranscriptsDisabled(_) => concat!(
                "Transcripts are disabled for this video.\n",
                "Possible reasons: The video owner has disabled captions or the video is a live stream.\n",
                "Solution: Try another video."
            )
            .to_string(),
            TranscriptError::NoTranscriptFound { .. } => concat!(
                "No transcript found for this video.\n",
                "Possible reasons: The video is too new, private, or has no captions.\n",
                "Solution: Try another video or check back later."
            )
            .to_string(),
            TranscriptError::VideoUnavailable(_) => concat!(
                "Video unavailable.\n",
                "Possible reasons: The video is private, deleted, or restricted in your region.\n",
                "Solution: Check the video URL or try a different video."
            )
            .to_string(),
            TranscriptError::Unexpected(cause) => format!(
                "An unexpected error occurred: {}\n\
                 Possible reasons: Network issues, invalid video ID, or YouTube API changes.\n\
                 Solution: Check your internet connection or try again later.",
                cause
            ),
        }
    }
}

impl From<reqwest::Error> for TranscriptError {
    fn from(err: reqwest::Error) -> Self {
        TranscriptError::Unexpected(err.to_string())
    }
}
