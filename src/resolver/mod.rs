use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Identifier embedded in a watch, short or embed URL
static EMBEDDED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})")
        .expect("embedded id pattern is valid")
});

/// Bare identifier, whole string
static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("bare id pattern is valid"));

/// A validated 11-character video identifier.
///
/// Only [`resolve`] and [`VideoId::parse`] construct one, so anything holding a
/// `VideoId` has already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accept a string only if it is exactly one identifier
    pub fn parse(candidate: &str) -> Option<Self> {
        BARE_ID
            .is_match(candidate)
            .then(|| VideoId(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract a video identifier from a pasted URL or a bare ID.
///
/// URL shapes (`v=`, `youtu.be/`, `youtube.com/embed/`) are searched anywhere in
/// the input and win over the bare-ID check. The search is deliberately loose:
/// an 11-character run after `v=` is accepted even inside an otherwise odd
/// string, and YouTube rejects it later if it is not a real video.
pub fn resolve(raw: &str) -> Option<VideoId> {
    let input = raw.trim();

    if let Some(id) = EMBEDDED_ID.captures(input).and_then(|caps| caps.get(1)) {
        return Some(VideoId(id.as_str().to_string()));
    }

    VideoId::parse(input)
}
