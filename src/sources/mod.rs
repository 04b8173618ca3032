use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod timedtext;
pub mod youtube;

use crate::resolver::VideoId;
use crate::TranscriptError;

/// One timed caption line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds (0 when the source does not say)
    pub duration: f64,

    /// Caption text, passed through as received
    pub text: String,
}

impl CaptionEntry {
    pub fn new(start: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration: 0.0,
            text: text.into(),
        }
    }
}

/// A caption language the user can pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
}

/// A caption track as listed by a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Language tag, e.g. `en` or `pt-BR`
    pub language_code: String,

    /// Human readable language name
    pub language: String,

    /// Whether the track was produced by speech recognition
    pub is_generated: bool,

    /// Source-specific location of the track
    pub base_url: String,
}

impl TrackInfo {
    pub fn language_option(&self) -> LanguageOption {
        LanguageOption {
            code: self.language_code.clone(),
            name: self.language.clone(),
        }
    }
}

/// Something that can list and fetch caption tracks for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List the tracks available for a video, in the order the source offers them
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TrackInfo>, TranscriptError>;

    /// Fetch the caption entries of one listed track
    async fn fetch_track(
        &self,
        video_id: &VideoId,
        track: &TrackInfo,
    ) -> Result<Vec<CaptionEntry>, TranscriptError>;

    /// Name of the backing service, for logs
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_option_from_track() {
        let track = TrackInfo {
            language_code: "de".into(),
            language: "German".into(),
            is_generated: true,
            base_url: "https://example.com/de".into(),
        };
        assert_eq!(
            track.language_option(),
            LanguageOption {
                code: "de".into(),
                name: "German".into()
            }
        );
    }
}
