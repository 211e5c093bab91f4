//! Transcript-to-summary pipeline
//!
//! Validation happens before any network traffic: the provider selector is
//! parsed when the request is built and the credential is checked before the
//! transcript is resolved.

use crate::config::Settings;
use crate::llm::{build_instructions, build_provider, LlmProvider, Provider, SummaryRequest};
use crate::transcript::{resolve_transcript, TranscriptSource};
use crate::Result;

/// A validated summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub url: String,
    pub provider: Provider,
    pub prompt_supplement: Option<String>,
}

impl SummarizeRequest {
    /// Build a request from raw input. Fails with `InvalidInput` for an
    /// unknown provider; a blank supplement is dropped.
    pub fn new(url: impl Into<String>, provider: &str, prompt_supplement: &str) -> Result<Self> {
        let provider = provider.parse::<Provider>()?;
        let prompt_supplement = match prompt_supplement.trim() {
            "" => None,
            _ => Some(prompt_supplement.to_string()),
        };

        Ok(Self {
            url: url.into(),
            provider,
            prompt_supplement,
        })
    }
}

/// Resolve the transcript behind `url` and summarize it with `provider`.
pub async fn generate_summary(
    settings: &Settings,
    source: &dyn TranscriptSource,
    url: &str,
    provider: &str,
    prompt_supplement: &str,
) -> Result<String> {
    let request = SummarizeRequest::new(url, provider, prompt_supplement)?;
    summarize_video(settings, source, &request).await
}

/// Run a validated request with credentials from `settings`.
#[tracing::instrument(skip_all, fields(url = %request.url, provider = %request.provider))]
pub async fn summarize_video(
    settings: &Settings,
    source: &dyn TranscriptSource,
    request: &SummarizeRequest,
) -> Result<String> {
    let llm = build_provider(request.provider, &settings.credentials)?;
    summarize_with(
        llm.as_ref(),
        source,
        &request.url,
        request.prompt_supplement.as_deref(),
    )
    .await
}

/// Resolve the transcript and hand it to an already built provider.
pub async fn summarize_with(
    llm: &dyn LlmProvider,
    source: &dyn TranscriptSource,
    url: &str,
    prompt_supplement: Option<&str>,
) -> Result<String> {
    let transcript = resolve_transcript(source, url).await?;
    tracing::info!(chars = transcript.len(), "Transcript resolved");

    let instructions = build_instructions(prompt_supplement);
    let summary = llm
        .summarize(SummaryRequest {
            instructions: &instructions,
            transcript: &transcript,
        })
        .await?;

    tracing::info!(provider = %llm.provider(), chars = summary.len(), "Summary generated");
    Ok(summary)
}
