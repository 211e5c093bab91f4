use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::config::Credentials;
use crate::llm::gemini::GeminiClient;
use crate::llm::openai::OpenAiClient;
use crate::{ResumoError, Result};

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Request(reqwest::Error),

    #[error("{provider} API error: {status} - {message}")]
    Api {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{provider} response did not contain any text")]
    EmptyResponse { provider: Provider },
}

impl From<reqwest::Error> for LlmError {
    /// Request URLs are dropped so they never end up in messages or logs.
    fn from(err: reqwest::Error) -> Self {
        LlmError::Request(err.without_url())
    }
}

/// Summary backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }

    /// The configured key for this provider, or a configuration error naming it.
    pub fn api_key<'a>(&self, credentials: &'a Credentials) -> Result<&'a str> {
        let key = match self {
            Provider::Gemini => credentials.gemini_key(),
            Provider::OpenAi => credentials.openai_key(),
        };
        key.ok_or_else(|| {
            ResumoError::Configuration(format!("{} API key is not configured.", self.name()))
        })
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = ResumoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(ResumoError::InvalidInput(format!(
                "Unsupported provider '{}'. Choose 'gemini' or 'openai'.",
                other
            ))),
        }
    }
}

/// Summary generation request payload.
pub struct SummaryRequest<'a> {
    pub instructions: &'a str,
    pub transcript: &'a str,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn provider(&self) -> Provider;

    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String>;
}

/// Build an LLM provider, failing before any network call when its key is missing.
pub fn build_provider(
    provider: Provider,
    credentials: &Credentials,
) -> Result<Box<dyn LlmProvider>> {
    let api_key = provider.api_key(credentials)?;
    match provider {
        Provider::Gemini => Ok(Box::new(GeminiClient::new(api_key))),
        Provider::OpenAi => Ok(Box::new(OpenAiClient::new(api_key))),
    }
}
