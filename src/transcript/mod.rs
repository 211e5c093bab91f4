//! Transcript resolution
//!
//! Turns a video URL into one flat transcript string: extract the video id,
//! list the caption tracks, pick one by language preference and join the
//! segment texts.

pub mod youtube;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::{ResumoError, Result};

pub use youtube::YouTubeTranscripts;

/// Caption languages tried in order before falling back to the first track.
pub const LANGUAGE_PREFERENCES: [&str; 3] = ["pt", "en", "pt-BR"];

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("YouTube returned status {status} for {url}")]
    Http { status: u16, url: String },

    #[error("could not get past the YouTube cookie consent page")]
    ConsentCookie,

    #[error("YouTube is blocking requests from this IP (captcha required)")]
    IpBlocked,

    #[error("YouTube is blocking requests from this client (bot check)")]
    RequestBlocked,

    #[error("video is age restricted")]
    AgeRestricted,

    #[error("video is unavailable")]
    VideoUnavailable,

    #[error("video is unplayable: {0}")]
    Unplayable(String),

    #[error("transcripts are disabled for this video")]
    TranscriptsDisabled,

    #[error("no transcript found for video {video_id}")]
    NoTranscriptFound { video_id: String },

    #[error("unexpected response: {0}")]
    Parse(String),
}

/// One caption track available for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTrack {
    pub video_id: String,
    pub language_code: String,
    pub language: String,
    pub is_generated: bool,
    pub base_url: String,
}

/// A timed caption line.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// A resolved transcript, flattened to plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub video_id: String,
    pub language_code: String,
    pub is_generated: bool,
    pub text: String,
}

/// Where caption tracks come from.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List the caption tracks of a video, in the source's default order.
    async fn list_transcripts(
        &self,
        video_id: &str,
    ) -> std::result::Result<Vec<TranscriptTrack>, TranscriptError>;

    /// Fetch the timed segments of one track.
    async fn fetch_segments(
        &self,
        track: &TranscriptTrack,
    ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// Extract the 11-character video id from a watch, short, embed or shorts URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pick a track by language preference.
///
/// For each preferred code a manually created track beats a generated one.
/// Without any match the first listed track is used.
pub fn select_track<'a>(
    tracks: &'a [TranscriptTrack],
    preferences: &[&str],
) -> Option<&'a TranscriptTrack> {
    preferences
        .iter()
        .find_map(|code| {
            tracks
                .iter()
                .find(|t| !t.is_generated && t.language_code == *code)
                .or_else(|| {
                    tracks
                        .iter()
                        .find(|t| t.is_generated && t.language_code == *code)
                })
        })
        .or_else(|| tracks.first())
}

/// Resolve the transcript of the video behind `url`.
#[tracing::instrument(skip(source))]
pub async fn resolve(source: &dyn TranscriptSource, url: &str) -> Result<Transcript> {
    let video_id = extract_video_id(url)
        .ok_or_else(|| ResumoError::InvalidInput("Invalid YouTube URL".to_string()))?;

    let tracks = source
        .list_transcripts(&video_id)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to list transcripts"))?;

    let track = select_track(&tracks, &LANGUAGE_PREFERENCES).ok_or_else(|| {
        TranscriptError::NoTranscriptFound {
            video_id: video_id.clone(),
        }
    })?;

    tracing::info!(
        video_id = %video_id,
        language = %track.language_code,
        generated = track.is_generated,
        "Selected transcript"
    );

    let segments = source
        .fetch_segments(track)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch transcript segments"))?;

    let text = segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Transcript {
        video_id,
        language_code: track.language_code.clone(),
        is_generated: track.is_generated,
        text,
    })
}

/// Resolve the transcript of the video behind `url` as plain text.
pub async fn resolve_transcript(source: &dyn TranscriptSource, url: &str) -> Result<String> {
    Ok(resolve(source, url).await?.text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    pub(crate) fn track(code: &str, generated: bool) -> TranscriptTrack {
        TranscriptTrack {
            video_id: "abc12345678".to_string(),
            language_code: code.to_string(),
            language: code.to_string(),
            is_generated: generated,
            base_url: format!("https://example.test/timedtext?lang={}", code),
        }
    }

    /// In-memory source recording which calls were made.
    #[derive(Default, Clone)]
    pub(crate) struct FakeSource {
        pub tracks: Vec<TranscriptTrack>,
        pub lines: Vec<&'static str>,
        pub fail_list: bool,
        pub listed: Arc<Mutex<Vec<String>>>,
        pub fetched: Arc<Mutex<Vec<String>>>,
    }

    impl FakeSource {
        pub(crate) fn new(tracks: Vec<TranscriptTrack>, lines: Vec<&'static str>) -> Self {
            Self {
                tracks,
                lines,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl TranscriptSource for FakeSource {
        async fn list_transcripts(
            &self,
            video_id: &str,
        ) -> std::result::Result<Vec<TranscriptTrack>, TranscriptError> {
            self.listed.lock().unwrap().push(video_id.to_string());
            if self.fail_list {
                return Err(TranscriptError::TranscriptsDisabled);
            }
            Ok(self.tracks.clone())
        }

        async fn fetch_segments(
            &self,
            track: &TranscriptTrack,
        ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError> {
            self.fetched
                .lock()
                .unwrap()
                .push(track.language_code.clone());
            Ok(self
                .lines
                .iter()
                .enumerate()
                .map(|(i, line)| TranscriptSegment {
                    text: line.to_string(),
                    start: i as f64,
                    duration: 1.0,
                })
                .collect())
        }
    }

    #[test]
    fn extracts_id_from_supported_url_shapes() {
        let urls = [
            "https://www.youtube.com/watch?v=abc12345678&t=30",
            "https://youtu.be/abc12345678",
            "https://www.youtube.com/embed/abc12345678",
            "https://www.youtube.com/shorts/abc12345678",
            "youtube.com/watch?feature=share&v=abc12345678",
            "http://m.youtube.com/watch?v=abc12345678#t=1m",
        ];
        for url in urls {
            assert_eq!(
                extract_video_id(url).as_deref(),
                Some("abc12345678"),
                "url: {}",
                url
            );
        }
    }

    #[test]
    fn ids_with_dash_and_underscore_are_kept() {
        assert_eq!(
            extract_video_id("https://youtu.be/a-b_c123456?si=xyz").as_deref(),
            Some("a-b_c123456")
        );
    }

    #[test]
    fn url_without_id_yields_none() {
        assert_eq!(extract_video_id("https://example.com/video"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn prefers_portuguese() {
        let tracks = vec![track("es", false), track("en", false), track("pt", false)];
        let selected = select_track(&tracks, &LANGUAGE_PREFERENCES).unwrap();
        assert_eq!(selected.language_code, "pt");
    }

    #[test]
    fn falls_back_to_english() {
        let tracks = vec![track("es", false), track("en", true)];
        let selected = select_track(&tracks, &LANGUAGE_PREFERENCES).unwrap();
        assert_eq!(selected.language_code, "en");
    }

    #[test]
    fn brazilian_portuguese_ranks_after_english() {
        let tracks = vec![track("pt-BR", false), track("en", true)];
        let selected = select_track(&tracks, &LANGUAGE_PREFERENCES).unwrap();
        assert_eq!(selected.language_code, "en");
    }

    #[test]
    fn unpreferred_languages_fall_back_to_first_track() {
        let tracks = vec![track("es", false), track("fr", false)];
        let selected = select_track(&tracks, &LANGUAGE_PREFERENCES).unwrap();
        assert_eq!(selected.language_code, "es");
    }

    #[test]
    fn manual_track_beats_generated_for_same_language() {
        let tracks = vec![track("pt", true), track("pt", false)];
        let selected = select_track(&tracks, &LANGUAGE_PREFERENCES).unwrap();
        assert!(!selected.is_generated);
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(select_track(&[], &LANGUAGE_PREFERENCES).is_none());
    }

    #[tokio::test]
    async fn joins_segments_with_single_spaces() {
        let source = FakeSource::new(
            vec![track("en", false), track("pt", true)],
            vec!["olá", "pessoal,", "tudo bem?"],
        );

        let transcript = resolve(&source, "https://youtu.be/abc12345678")
            .await
            .expect("transcript should resolve");

        assert_eq!(transcript.text, "olá pessoal, tudo bem?");
        assert_eq!(transcript.language_code, "pt");
        assert!(transcript.is_generated);
        assert_eq!(*source.listed.lock().unwrap(), vec!["abc12345678"]);
        assert_eq!(*source.fetched.lock().unwrap(), vec!["pt"]);
    }

    #[tokio::test]
    async fn invalid_url_fails_without_calling_source() {
        let source = FakeSource::new(vec![track("pt", false)], vec!["x"]);

        let err = resolve_transcript(&source, "https://example.com/video")
            .await
            .unwrap_err();

        assert!(matches!(err, ResumoError::InvalidInput(_)));
        assert!(source.listed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_is_a_fetch_failure() {
        let source = FakeSource {
            fail_list: true,
            ..Default::default()
        };

        let err = resolve_transcript(&source, "https://youtu.be/abc12345678")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResumoError::FetchFailure(TranscriptError::TranscriptsDisabled)
        ));
        assert!(err.to_string().starts_with("Failed to fetch transcript:"));
    }

    #[tokio::test]
    async fn no_tracks_is_a_fetch_failure() {
        let source = FakeSource::default();

        let err = resolve_transcript(&source, "https://youtu.be/abc12345678")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResumoError::FetchFailure(TranscriptError::NoTranscriptFound { .. })
        ));
        assert!(source.fetched.lock().unwrap().is_empty());
    }
}
