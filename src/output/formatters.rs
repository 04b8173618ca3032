use anyhow::Result;
use serde::Serialize;

use crate::sources::{CaptionEntry, LanguageOption};
use crate::transcript::TranscriptOutcome;

/// Render a start offset as `MM:SS`.
///
/// Both parts are truncated, never rounded. There is no hour field, so past
/// 99:59 the minutes simply grow wider. Negative or non-finite offsets show as 00:00.
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{:02}:{:02}", minutes, secs)
}

/// One `MM:SS text` line per entry, in the order given
pub fn format_transcript(entries: &[CaptionEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{} {}", format_timestamp(entry.start), entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonTranscript<'a> {
    video_id: &'a str,
    selected_language: &'a str,
    languages: &'a [LanguageOption],
    entries: &'a [CaptionEntry],
    transcript: &'a str,
}

/// Format as plain text (the formatted transcript itself)
pub fn format_as_text(outcome: &TranscriptOutcome) -> String {
    outcome.transcript.clone()
}

/// Format as JSON with the raw entries next to the formatted text
pub fn format_as_json(outcome: &TranscriptOutcome) -> Result<String> {
    let json = JsonTranscript {
        video_id: outcome.video_id.as_str(),
        selected_language: &outcome.selected_language,
        languages: &outcome.languages,
        entries: &outcome.entries,
        transcript: &outcome.transcript,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::VideoId;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(5.0), "00:05");
        assert_eq!(format_timestamp(59.999), "00:59");
        assert_eq!(format_timestamp(60.0), "01:00");
        assert_eq!(format_timestamp(125.9), "02:05");
        assert_eq!(format_timestamp(5999.0), "99:59");
        assert_eq!(format_timestamp(6000.0), "100:00");
    }

    #[test]
    fn test_format_timestamp_clamps_bad_offsets() {
        assert_eq!(format_timestamp(-3.0), "00:00");
        assert_eq!(format_timestamp(f64::NAN), "00:00");
        assert_eq!(format_timestamp(f64::INFINITY), "00:00");
    }

    #[test]
    fn test_format_empty_transcript() {
        assert_eq!(format_transcript(&[]), "");
    }

    #[test]
    fn test_format_single_entry() {
        assert_eq!(format_transcript(&[CaptionEntry::new(5.0, "hi")]), "00:05 hi");
        assert_eq!(format_transcript(&[CaptionEntry::new(125.9, "x")]), "02:05 x");
    }

    #[test]
    fn test_format_keeps_entry_order() {
        let entries = vec![
            CaptionEntry::new(30.0, "third"),
            CaptionEntry::new(1.0, "first"),
            CaptionEntry::new(30.0, "third"),
        ];
        assert_eq!(format_transcript(&entries), "00:30 third\n00:01 first\n00:30 third");
    }

    #[test]
    fn test_format_passes_text_through() {
        let entries = vec![CaptionEntry::new(61.5, "<i>two\nlines</i>")];
        assert_eq!(format_transcript(&entries), "01:01 <i>two\nlines</i>");
    }

    #[test]
    fn test_format_as_json() {
        let entries = vec![CaptionEntry::new(0.0, "Never")];
        let outcome = TranscriptOutcome {
            video_id: VideoId::parse("dQw4w9WgXcQ").unwrap(),
            languages: vec![LanguageOption { code: "en".into(), name: "English".into() }],
            selected_language: "en".into(),
            transcript: format_transcript(&entries),
            entries,
        };

        let value: serde_json::Value = serde_json::from_str(&format_as_json(&outcome).unwrap()).unwrap();
        assert_eq!(value["video_id"], "dQw4w9WgXcQ");
        assert_eq!(value["selected_language"], "en");
        assert_eq!(value["languages"][0]["name"], "English");
        assert_eq!(value["transcript"], "00:00 Never");
        assert_eq!(format_as_text(&outcome), "00:00 Never");
    }
}
