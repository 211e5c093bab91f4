use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm::client::{LlmError, LlmProvider, Provider, SummaryRequest};
use crate::llm::prompts::build_combined_prompt;
use crate::Result;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    http: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            GEMINI_ENDPOINT,
            Provider::Gemini.model()
        )
    }

    /// The key travels in a header so it never shows up in URLs or errors.
    fn build_request(
        &self,
        body: &GeminiGenerateContentRequest,
    ) -> std::result::Result<reqwest::Request, LlmError> {
        Ok(self
            .http
            .post(self.request_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .build()?)
    }
}

fn generate_body(prompt: String) -> GeminiGenerateContentRequest {
    GeminiGenerateContentRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart { text: prompt }],
        }],
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    #[tracing::instrument(skip_all, fields(model = Provider::Gemini.model()))]
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String> {
        let prompt = build_combined_prompt(request.instructions, request.transcript);

        let http_request = self.build_request(&generate_body(prompt))?;

        let response = self
            .http
            .execute(http_request)
            .await
            .map_err(LlmError::from)
            .inspect_err(|e| tracing::error!(error = %e, "Gemini request failed"))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                provider: Provider::Gemini,
                status,
                message,
            }
            .into());
        }

        let payload: GeminiGenerateContentResponse =
            response.json().await.map_err(LlmError::from)?;

        Ok(first_candidate_text(payload)?)
    }
}

/// Text parts of the first candidate, concatenated.
fn first_candidate_text(
    payload: GeminiGenerateContentResponse,
) -> std::result::Result<String, LlmError> {
    let text: String = payload
        .candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::EmptyResponse {
            provider: Provider::Gemini,
        });
    }
    Ok(text)
}

#[derive(Debug, Serialize)]
struct GeminiGenerateContentRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}
