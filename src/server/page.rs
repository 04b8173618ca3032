use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::sources::LanguageOption;

/// Everything the form page shows for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub url: String,
    pub languages: Vec<LanguageOption>,
    pub selected_language: Option<String>,
    pub transcript: Option<String>,
    pub error: Option<String>,
}

const STYLE: &str = r#"
body { margin: 0; min-height: 100vh; font-family: Arial, sans-serif; background: #f4f4f8; }
.container { max-width: 560px; margin: 48px auto; background: #fff; border-radius: 12px; padding: 28px; }
form { display: flex; flex-direction: column; gap: 10px; }
.error { color: #c0392b; margin-top: 12px; font-weight: 600; white-space: pre-line; }
textarea { width: 100%; height: 320px; box-sizing: border-box; }
.copied-msg { display: none; color: #27ae60; }
.copied-msg.show { display: block; }
"#;

const SCRIPT: &str = r#"
function copyTranscript() {
    var textarea = document.getElementById('transcript-text');
    textarea.select();
    navigator.clipboard.writeText(textarea.value);
    var msg = document.getElementById('copied-msg');
    msg.classList.add('show');
    setTimeout(function () { msg.classList.remove('show'); }, 1200);
}
"#;

/// Render the single form page
pub fn render(view: &PageView) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>YouTube Transcript App</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    html.push_str("<div class=\"container\">\n<h1>YouTube Transcript App</h1>\n");

    html.push_str("<form method=\"post\" action=\"/\">\n");
    html.push_str("<label for=\"url\">YouTube Video URL or ID:</label>\n");
    html.push_str(&format!(
        "<input type=\"text\" id=\"url\" name=\"url\" required value=\"{}\">\n",
        attr(&view.url)
    ));

    if view.languages.len() > 1 {
        html.push_str("<label for=\"language\">Transcript Language:</label>\n");
        html.push_str("<select id=\"language\" name=\"language\">\n");
        for option in &view.languages {
            let selected = view.selected_language.as_deref() == Some(option.code.as_str());
            html.push_str(&format!(
                "<option value=\"{}\"{}>{} ({})</option>\n",
                attr(&option.code),
                if selected { " selected" } else { "" },
                text(&option.name),
                text(&option.code)
            ));
        }
        html.push_str("</select>\n");
    }

    html.push_str("<button type=\"submit\">Get Transcript</button>\n</form>\n");

    if let Some(error) = &view.error {
        html.push_str(&format!("<div class=\"error\">{}</div>\n", text(error)));
    }

    if let Some(transcript) = view.transcript.as_deref().filter(|t| !t.is_empty()) {
        html.push_str("<div class=\"transcript-section\">\n<h2>Transcript</h2>\n");
        html.push_str(&format!(
            "<textarea id=\"transcript-text\" readonly>{}</textarea>\n",
            text(transcript)
        ));
        html.push_str("<button type=\"button\" onclick=\"copyTranscript()\">Copy Transcript</button>\n");
        html.push_str("<div id=\"copied-msg\" class=\"copied-msg\">Copied!</div>\n");
        html.push_str("<form method=\"post\" action=\"/download\">\n");
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"transcript\" value=\"{}\">\n",
            attr(transcript)
        ));
        html.push_str("<button type=\"submit\">Download as .txt</button>\n</form>\n</div>\n");
        html.push_str(&format!("<script>{}</script>\n", SCRIPT));
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(code: &str, name: &str) -> LanguageOption {
        LanguageOption { code: code.into(), name: name.into() }
    }

    #[test]
    fn test_empty_page_has_form_only() {
        let html = render(&PageView::default());
        assert!(html.contains("name=\"url\""));
        assert!(!html.contains("<select"));
        assert!(!html.contains("transcript-text"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_single_language_hides_selector() {
        let html = render(&PageView {
            languages: vec![lang("en", "English")],
            transcript: Some("00:00 hi".into()),
            ..Default::default()
        });
        assert!(!html.contains("<select"));
        assert!(html.contains("00:00 hi</textarea>"));
        assert!(html.contains("action=\"/download\""));
    }

    #[test]
    fn test_selector_marks_effective_language() {
        let html = render(&PageView {
            languages: vec![lang("en", "English"), lang("de", "German")],
            selected_language: Some("de".into()),
            ..Default::default()
        });
        assert!(html.contains("<option value=\"en\">English (en)</option>"));
        assert!(html.contains("<option value=\"de\" selected>German (de)</option>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = render(&PageView {
            url: "\"><script>".into(),
            transcript: Some("00:01 <b>&</b>".into()),
            error: None,
            ..Default::default()
        });
        assert!(!html.contains("\"><script>"));
        assert!(html.contains("00:01 &lt;b&gt;&amp;&lt;/b&gt;</textarea>"));
    }

    #[test]
    fn test_error_is_shown() {
        let html = render(&PageView {
            error: Some("Invalid YouTube URL or ID.".into()),
            ..Default::default()
        });
        assert!(html.contains("<div class=\"error\">Invalid YouTube URL or ID.</div>"));
    }
}
