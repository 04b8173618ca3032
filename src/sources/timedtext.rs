use once_cell::sync::Lazy;
use regex::Regex;

use super::CaptionEntry;
use crate::TranscriptError;

static TEXT_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text\s+start="([^"]*)"(?:\s+dur="([^"]*)")?[^>]*?(?:/>|>(.*?)</text>)"#)
        .expect("timedtext pattern is valid")
});

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup tag pattern is valid"));

/// Parse a YouTube timedtext XML document into caption entries.
///
/// The element text is XML-decoded and then HTML-decoded, because YouTube
/// escapes entities like `&#39;` a second time. Formatting tags such as `<i>`
/// are dropped and elements without text are skipped.
pub fn parse_timedtext(xml: &str) -> Result<Vec<CaptionEntry>, TranscriptError> {
    let mut entries = Vec::new();

    for caps in TEXT_ELEMENT.captures_iter(xml) {
        let raw = match caps.get(3) {
            Some(text) if !text.as_str().is_empty() => text.as_str(),
            _ => continue,
        };

        let start = parse_seconds(&caps[1])?;
        let duration = match caps.get(2) {
            Some(dur) if !dur.as_str().is_empty() => parse_seconds(dur.as_str())?,
            _ => 0.0,
        };
        let text = decode_caption_text(raw);

        entries.push(CaptionEntry {
            start,
            duration,
            text,
        });
    }

    if entries.is_empty() && !xml.contains("<transcript") {
        return Err(TranscriptError::Unexpected(
            "Caption track did not contain a timedtext document".to_string(),
        ));
    }

    tracing::debug!("Parsed {} caption entries", entries.len());
    Ok(entries)
}

fn decode_caption_text(raw: &str) -> String {
    let xml_decoded = html_escape::decode_html_entities(raw);
    let html_decoded = html_escape::decode_html_entities(&xml_decoded);
    MARKUP_TAG.replace_all(&html_decoded, "").into_owned()
}

fn parse_seconds(value: &str) -> Result<f64, TranscriptError> {
    value.trim().parse::<f64>().map_err(|_| {
        TranscriptError::Unexpected(format!("Invalid caption offset in timedtext: {:?}", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="1.54">Never</text><text start="3.2" dur="2">gonna &amp;#39;give&amp;#39; you up</text><text start="7.1" dur="1.1">line one
line two</text></transcript>"#;

    #[test]
    fn test_parses_entries_in_document_order() {
        let entries = parse_timedtext(SAMPLE).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], CaptionEntry { start: 0.0, duration: 1.54, text: "Never".into() });
        assert_eq!(entries[1].start, 3.2);
        assert_eq!(entries[2].text, "line one\nline two");
    }

    #[test]
    fn test_double_escaped_entities_are_decoded() {
        let entries = parse_timedtext(SAMPLE).unwrap();
        assert_eq!(entries[1].text, "gonna 'give' you up");
    }

    #[test]
    fn test_markup_is_stripped_and_empty_elements_skipped() {
        let xml = r#"<transcript><text start="1" dur="2">don&amp;#39;t &lt;i&gt;stop&lt;/i&gt;</text><text start="4" dur="1"></text><text start="5" dur="1"/><text start="6" dur="1">now</text></transcript>"#;
        let entries = parse_timedtext(xml).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "don't stop");
        assert_eq!(entries[1].start, 6.0);
        assert_eq!(crate::output::format_transcript(&entries), "00:01 don't stop\n00:06 now");
    }

    #[test]
    fn test_literal_ampersand_survives() {
        let xml = r#"<transcript><text start="0" dur="1">rock &amp;amp; roll</text></transcript>"#;
        assert_eq!(parse_timedtext(xml).unwrap()[0].text, "rock & roll");
    }

    #[test]
    fn test_missing_duration_defaults_to_zero() {
        let xml = r#"<transcript><text start="12.5">hi</text></transcript>"#;
        let entries = parse_timedtext(xml).unwrap();
        assert_eq!(entries[0].duration, 0.0);
        assert_eq!(entries[0].start, 12.5);
    }

    #[test]
    fn test_empty_transcript_is_not_an_error() {
        assert!(parse_timedtext("<transcript></transcript>").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_timedtext_bodies() {
        assert!(matches!(
            parse_timedtext("<html>blocked</html>"),
            Err(TranscriptError::Unexpected(_))
        ));
    }

    #[test]
    fn test_rejects_bad_offsets() {
        let xml = r#"<transcript><text start="abc" dur="1">x</text></transcript>"#;
        assert!(parse_timedtext(xml).is_err());
    }
}
