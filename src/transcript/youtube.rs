//! YouTube caption tracks over the innertube player API.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client};
use serde_json::{json, Value};

use super::{TranscriptError, TranscriptSegment, TranscriptSource, TranscriptTrack};

const WATCH_URL: &str = "https://www.youtube.com/watch";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

static INNERTUBE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap());

static CONSENT_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="v" value="(.*?)""#).unwrap());

static TEXT_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<text\b([^>]*)>(.*?)</text>"#).unwrap()
});

static ATTRIBUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Transcript source backed by youtube.com.
pub struct YouTubeTranscripts {
    http: Client,
}

impl YouTubeTranscripts {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    async fn get_text(
        &self,
        url: &str,
        consent: Option<&str>,
    ) -> Result<String, TranscriptError> {
        let mut request = self
            .http
            .get(url)
            .header(header::ACCEPT_LANGUAGE, "en-US");
        if let Some(value) = consent {
            request = request.header(header::COOKIE, format!("CONSENT=YES+{}", value));
        }

        let resp = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(TranscriptError::Http {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(resp.text().await?)
    }

    /// Fetch the watch page, going through the consent interstitial once.
    async fn fetch_watch_html(&self, video_id: &str) -> Result<String, TranscriptError> {
        let url = format!("{}?v={}", WATCH_URL, video_id);
        let html = self.get_text(&url, None).await?;

        if !is_consent_page(&html) {
            return Ok(html);
        }

        tracing::debug!("Hit cookie consent page, retrying with consent cookie");
        let value = CONSENT_VALUE_RE
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(TranscriptError::ConsentCookie)?;

        let html = self.get_text(&url, Some(value.as_str())).await?;
        if is_consent_page(&html) {
            return Err(TranscriptError::ConsentCookie);
        }
        Ok(html)
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<Value, TranscriptError> {
        let url = format!("{}?key={}", INNERTUBE_PLAYER_URL, api_key);
        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(TranscriptError::Http {
                status: resp.status().as_u16(),
                url: INNERTUBE_PLAYER_URL.to_string(),
            });
        }

        Ok(resp.json::<Value>().await?)
    }
}

impl Default for YouTubeTranscripts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    #[tracing::instrument(skip(self))]
    async fn list_transcripts(
        &self,
        video_id: &str,
    ) -> Result<Vec<TranscriptTrack>, TranscriptError> {
        let html = self.fetch_watch_html(video_id).await?;
        let api_key = extract_innertube_key(&html)?;
        let player = self.fetch_player(video_id, &api_key).await?;

        check_playability(&player)?;
        let tracks = parse_caption_tracks(video_id, &player)?;

        tracing::debug!(count = tracks.len(), "Found caption tracks");
        Ok(tracks)
    }

    #[tracing::instrument(skip(self, track), fields(language = %track.language_code))]
    async fn fetch_segments(
        &self,
        track: &TranscriptTrack,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let xml = self.get_text(&track.base_url, None).await?;
        Ok(parse_timedtext(&xml))
    }
}

fn is_consent_page(html: &str) -> bool {
    html.contains("action=\"https://consent.youtube.com/s\"")
}

fn extract_innertube_key(html: &str) -> Result<String, TranscriptError> {
    if let Some(key) = INNERTUBE_KEY_RE.captures(html).and_then(|caps| caps.get(1)) {
        return Ok(key.as_str().to_string());
    }

    if html.contains("class=\"g-recaptcha\"") {
        return Err(TranscriptError::IpBlocked);
    }
    Err(TranscriptError::Parse(
        "INNERTUBE_API_KEY not found in watch page".to_string(),
    ))
}

fn check_playability(player: &Value) -> Result<(), TranscriptError> {
    let status = &player["playabilityStatus"];
    let reason = status["reason"].as_str().unwrap_or_default();

    match status["status"].as_str() {
        None | Some("OK") => Ok(()),
        Some("LOGIN_REQUIRED") if reason.contains("not a bot") => {
            Err(TranscriptError::RequestBlocked)
        }
        Some("LOGIN_REQUIRED") => Err(TranscriptError::AgeRestricted),
        Some("ERROR") if reason.to_lowercase().contains("unavailable") => {
            Err(TranscriptError::VideoUnavailable)
        }
        Some(_) => Err(TranscriptError::Unplayable(reason.to_string())),
    }
}

/// Caption tracks from a player response, manually created ones first.
fn parse_caption_tracks(
    video_id: &str,
    player: &Value,
) -> Result<Vec<TranscriptTrack>, TranscriptError> {
    let renderer = &player["captions"]["playerCaptionsTracklistRenderer"];
    if renderer.is_null() {
        return Err(TranscriptError::TranscriptsDisabled);
    }

    let Some(entries) = renderer["captionTracks"].as_array() else {
        return Err(TranscriptError::TranscriptsDisabled);
    };

    let mut manual = Vec::new();
    let mut generated = Vec::new();

    for entry in entries {
        let (Some(base_url), Some(language_code)) =
            (entry["baseUrl"].as_str(), entry["languageCode"].as_str())
        else {
            tracing::warn!(entry = %entry, "Skipping caption track without baseUrl/languageCode");
            continue;
        };

        let language = entry["name"]["runs"][0]["text"]
            .as_str()
            .or_else(|| entry["name"]["simpleText"].as_str())
            .unwrap_or(language_code)
            .to_string();

        let is_generated = entry["kind"].as_str() == Some("asr");

        let track = TranscriptTrack {
            video_id: video_id.to_string(),
            language_code: language_code.to_string(),
            language,
            is_generated,
            base_url: base_url.replace("&fmt=srv3", ""),
        };

        if is_generated {
            generated.push(track);
        } else {
            manual.push(track);
        }
    }

    manual.extend(generated);
    Ok(manual)
}

/// Parse timedtext XML into segments, skipping empty lines.
fn parse_timedtext(xml: &str) -> Vec<TranscriptSegment> {
    TEXT_ELEMENT_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let raw = caps.get(2).map_or("", |m| m.as_str());

            // XML layer first, then the HTML escaping YouTube puts inside it.
            let text = decode_entities(&decode_entities(raw));
            let text = TAG_RE.replace_all(&text, "").into_owned();
            if text.is_empty() {
                return None;
            }

            let mut start = 0.0;
            let mut duration = 0.0;
            for attr in ATTRIBUTE_RE.captures_iter(attrs) {
                let value = attr[2].parse::<f64>().unwrap_or(0.0);
                match &attr[1] {
                    "start" => start = value,
                    "dur" => duration = value,
                    _ => {}
                }
            }

            Some(TranscriptSegment {
                text,
                start,
                duration,
            })
        })
        .collect()
}

fn decode_entities(input: &str) -> String {
    ENTITY_RE
        .replace_all(input, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16).ok())
                    .unwrap_or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
