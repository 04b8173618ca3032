use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transcript::TranscriptOutcome;

pub mod formatters;

pub use formatters::*;

/// File name offered for downloaded transcripts
pub const DOWNLOAD_FILE_NAME: &str = "transcript.txt";

fn render(outcome: &TranscriptOutcome, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_as_text(outcome)),
        OutputFormat::Json => format_as_json(outcome),
    }
}

/// Save a transcript to file, UTF-8, no trailing newline added
pub fn save_to_file(outcome: &TranscriptOutcome, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(outcome, format)?;
    fs_err::write(path, content.as_bytes())?;
    Ok(())
}

/// Print a transcript to the console
pub fn print_to_console(outcome: &TranscriptOutcome, format: &OutputFormat) -> Result<()> {
    let content = render(outcome, format)?;
    println!("{}", content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::VideoId;
    use crate::sources::CaptionEntry;

    #[test]
    fn test_save_text_is_verbatim() {
        let entries = vec![CaptionEntry::new(0.0, "Grüße"), CaptionEntry::new(3.0, "gonna")];
        let outcome = TranscriptOutcome {
            video_id: VideoId::parse("dQw4w9WgXcQ").unwrap(),
            languages: vec![],
            selected_language: "de".into(),
            transcript: format_transcript(&entries),
            entries,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DOWNLOAD_FILE_NAME);
        save_to_file(&outcome, &path, &OutputFormat::Text).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "00:00 Grüße\n00:03 gonna");
    }
}
