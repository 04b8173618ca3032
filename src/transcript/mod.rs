use serde::Serialize;

use crate::output::format_transcript;
use crate::resolver::{self, VideoId};
use crate::sources::{CaptionEntry, LanguageOption, TrackInfo, TranscriptSource};
use crate::TranscriptError;

/// A fetched and formatted transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptOutcome {
    /// Identifier the input resolved to
    pub video_id: VideoId,

    /// Every track the video offers, in source order
    pub languages: Vec<LanguageOption>,

    /// Language of the track that was fetched
    pub selected_language: String,

    /// Entries of the fetched track
    pub entries: Vec<CaptionEntry>,

    /// `MM:SS text` lines
    pub transcript: String,
}

/// A resolved video together with the tracks its source lists
#[derive(Debug, Clone, PartialEq)]
pub struct TrackListing {
    pub video_id: VideoId,
    pub tracks: Vec<TrackInfo>,
}

impl TrackListing {
    /// `(code, name)` of every track, in source order
    pub fn languages(&self) -> Vec<LanguageOption> {
        self.tracks.iter().map(TrackInfo::language_option).collect()
    }
}

/// Resolve, list, select, fetch, format.
///
/// Holds nothing but the source, so one pipeline serves any number of
/// concurrent requests.
pub struct TranscriptPipeline<S> {
    source: S,
}

impl<S: TranscriptSource> TranscriptPipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one transcript request.
    ///
    /// `language` picks a track by code; `None` (or blank) takes the first track
    /// the source lists. Invalid input fails before the source is contacted.
    pub async fn run(
        &self,
        raw_input: &str,
        language: Option<&str>,
    ) -> Result<TranscriptOutcome, TranscriptError> {
        let listing = self.list(raw_input).await?;
        self.fetch(listing, language).await
    }

    /// Resolve the input and list the video's tracks without fetching any
    pub async fn list(&self, raw_input: &str) -> Result<TrackListing, TranscriptError> {
        let video_id = resolver::resolve(raw_input)
            .ok_or_else(|| TranscriptError::InvalidIdentifier(raw_input.trim().to_string()))?;

        tracing::info!("Listing transcripts for {} via {}", video_id, self.source.source_name());
        let tracks = self.source.list_tracks(&video_id).await?;
        Ok(TrackListing { video_id, tracks })
    }

    /// Select a track from a listing, fetch it and format it
    pub async fn fetch(
        &self,
        listing: TrackListing,
        language: Option<&str>,
    ) -> Result<TranscriptOutcome, TranscriptError> {
        let requested = language.map(str::trim).filter(|code| !code.is_empty());
        let track = select_track(&listing.video_id, &listing.tracks, requested)?;
        tracing::info!(
            "Fetching {} transcript ({}) for {}",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" },
            listing.video_id
        );

        let entries = self.source.fetch_track(&listing.video_id, track).await?;
        let transcript = format_transcript(&entries);

        Ok(TranscriptOutcome {
            selected_language: track.language_code.clone(),
            languages: listing.languages(),
            video_id: listing.video_id.clone(),
            entries,
            transcript,
        })
    }

    /// List the caption languages of a video without fetching any track
    pub async fn languages(&self, raw_input: &str) -> Result<(VideoId, Vec<LanguageOption>), TranscriptError> {
        let listing = self.list(raw_input).await?;
        let languages = listing.languages();
        Ok((listing.video_id, languages))
    }
}

fn select_track<'a>(
    video_id: &VideoId,
    tracks: &'a [TrackInfo],
    requested: Option<&str>,
) -> Result<&'a TrackInfo, TranscriptError> {
    let found = match requested {
        Some(code) => tracks.iter().find(|t| t.language_code == code),
        None => tracks.first(),
    };

    found.ok_or_else(|| TranscriptError::NoTranscriptFound {
        video_id: video_id.to_string(),
        language: requested.unwrap_or("default").to_string(),
    })
}
