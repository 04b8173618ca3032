use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{timedtext, CaptionEntry, TrackInfo, TranscriptSource};
use crate::config::YoutubeConfig;
use crate::resolver::VideoId;
use crate::TranscriptError;

static API_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("api key pattern is valid")
});

static CONSENT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="v" value="(.*?)""#).expect("consent pattern is valid"));

const CONSENT_FORM: &str = "action=\"https://consent.youtube.com/s\"";

/// Caption tracks straight from YouTube: watch page, innertube player API, timedtext
pub struct YoutubeSource {
    client: reqwest::Client,
    cookies: Arc<Jar>,
    config: YoutubeConfig,
}

impl YoutubeSource {
    pub fn new(config: &YoutubeConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|_| anyhow::anyhow!("Invalid accept_language: {}", config.accept_language))?,
        );

        let cookies = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .cookie_provider(cookies.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            cookies,
            config: config.clone(),
        })
    }

    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<String, TranscriptError> {
        let url = self.config.watch_url.replace("{video_id}", video_id.as_str());
        tracing::debug!("Fetching watch page: {}", url);

        let html = self.get_text(&url, video_id).await?;
        if !html.contains(CONSENT_FORM) {
            return Ok(html);
        }

        tracing::debug!("Consent page served for {}, setting consent cookie", video_id);
        self.accept_consent(&html, &url)?;

        let html = self.get_text(&url, video_id).await?;
        if html.contains(CONSENT_FORM) {
            return Err(TranscriptError::Unexpected(format!(
                "Failed to get past the YouTube consent page for video {}",
                video_id
            )));
        }
        Ok(html)
    }

    fn accept_consent(&self, html: &str, page_url: &str) -> Result<(), TranscriptError> {
        let value = CONSENT_VALUE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| {
                TranscriptError::Unexpected("YouTube consent page had no consent value".to_string())
            })?;
        let url = Url::parse(page_url).map_err(|e| TranscriptError::Unexpected(e.to_string()))?;

        self.cookies.add_cookie_str(
            &format!("CONSENT=YES+{}; Domain=.youtube.com", value.as_str()),
            &url,
        );
        Ok(())
    }

    async fn fetch_player_response(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> Result<Value, TranscriptError> {
        let url = self.config.innertube_url.replace("{api_key}", api_key);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": self.config.client_name,
                    "clientVersion": self.config.client_version
                }
            },
            "videoId": video_id.as_str()
        });

        tracing::debug!("Requesting innertube player data for {}", video_id);
        let response = self.client.post(&url).json(&body).send().await?;
        check_status(response.status(), video_id)?;

        response.json::<Value>().await.map_err(|e| {
            TranscriptError::Unexpected(format!("Failed to parse innertube response: {}", e))
        })
    }

    async fn get_text(&self, url: &str, video_id: &VideoId) -> Result<String, TranscriptError> {
        let response = self.client.get(url).send().await?;
        check_status(response.status(), video_id)?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeSource {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TrackInfo>, TranscriptError> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        let player = self.fetch_player_response(video_id, &api_key).await?;
        tracks_from_player_response(video_id, &player)
    }

    async fn fetch_track(
        &self,
        video_id: &VideoId,
        track: &TrackInfo,
    ) -> Result<Vec<CaptionEntry>, TranscriptError> {
        if track.base_url.contains("&exp=xpe") {
            return Err(TranscriptError::Unexpected(format!(
                "Caption track for video {} requires a PO token",
                video_id
            )));
        }

        tracing::debug!("Fetching {} captions for {}", track.language_code, video_id);
        let xml = self.get_text(&track.base_url, video_id).await?;
        timedtext::parse_timedtext(&xml)
    }

    fn source_name(&self) -> &'static str {
        "YouTube"
    }
}

fn check_status(status: StatusCode, video_id: &VideoId) -> Result<(), TranscriptError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptError::Unexpected(format!(
            "YouTube is blocking requests from this IP (HTTP 429 for video {})",
            video_id
        )));
    }
    if !status.is_success() {
        return Err(TranscriptError::Unexpected(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        )));
    }
    Ok(())
}

/// Pull the innertube API key out of a watch page
pub fn extract_api_key(html: &str, video_id: &VideoId) -> Result<String, TranscriptError> {
    if html.contains("class=\"g-recaptcha\"") {
        return Err(TranscriptError::Unexpected(format!(
            "YouTube answered with a captcha for video {}; requests from this IP are blocked",
            video_id
        )));
    }

    API_KEY
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|key| key.as_str().to_string())
        .ok_or_else(|| {
            TranscriptError::Unexpected(format!(
                "Could not find the innertube API key on the watch page of {}",
                video_id
            ))
        })
}

/// Turn an innertube player response into the list of caption tracks.
///
/// Manually created tracks come first, then generated ones; each group keeps
/// the order YouTube returned it in.
pub fn tracks_from_player_response(
    video_id: &VideoId,
    player: &Value,
) -> Result<Vec<TrackInfo>, TranscriptError> {
    assert_playable(video_id, player)?;

    let caption_tracks = player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .and_then(|r| r.get("captionTracks"))
        .and_then(|t| t.as_array())
        .ok_or_else(|| TranscriptError::TranscriptsDisabled(video_id.to_string()))?;

    let (manual, generated): (Vec<TrackInfo>, Vec<TrackInfo>) = caption_tracks
        .iter()
        .filter_map(track_from_json)
        .partition(|track| !track.is_generated);

    let tracks: Vec<TrackInfo> = manual.into_iter().chain(generated).collect();
    if tracks.is_empty() {
        return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
    }

    tracing::debug!("Video {} has {} caption tracks", video_id, tracks.len());
    Ok(tracks)
}

fn track_from_json(caption: &Value) -> Option<TrackInfo> {
    let language_code = caption.get("languageCode")?.as_str()?.to_string();
    let base_url = caption.get("baseUrl")?.as_str()?.replace("&fmt=srv3", "");

    let language = caption
        .get("name")
        .and_then(|n| {
            n.get("simpleText").or_else(|| {
                n.get("runs")
                    .and_then(|r| r.as_array())
                    .and_then(|runs| runs.first())
                    .and_then(|run| run.get("text"))
            })
        })
        .and_then(|t| t.as_str())
        .unwrap_or(&language_code)
        .to_string();

    let is_generated = caption.get("kind").and_then(|k| k.as_str()) == Some("asr");

    Some(TrackInfo {
        language_code,
        language,
        is_generated,
        base_url,
    })
}

fn assert_playable(video_id: &VideoId, player: &Value) -> Result<(), TranscriptError> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability.get("status").and_then(|s| s.as_str()).unwrap_or("");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability.get("reason").and_then(|r| r.as_str()).unwrap_or("");
    if status == "ERROR" && reason.to_lowercase().contains("unavailable") {
        return Err(TranscriptError::VideoUnavailable(video_id.to_string()));
    }

    tracing::warn!("Video {} is not playable: status={} reason={}", video_id, status, reason);
    Err(TranscriptError::Unexpected(format!(
        "Video {} is unplayable ({}): {}",
        video_id,
        status,
        if reason.is_empty() { "no reason given" } else { reason }
    )))
}
