use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::llm::client::{LlmError, LlmProvider, Provider, SummaryRequest};
use crate::llm::prompts::transcript_message;
use crate::Result;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    pub async fn send_completion_request(
        &self,
        system_content: &str,
        user_content: String,
    ) -> std::result::Result<CompletionResponse, LlmError> {
        let body = completion_body(system_content, user_content);

        let resp = self
            .client
            .post(format!("{}/chat/completions", OPENAI_BASE_URL))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                provider: Provider::OpenAi,
                status,
                message,
            });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

/// Chat completion payload: instructions as the system message, transcript as the user message.
fn completion_body(system_content: &str, user_content: String) -> serde_json::Value {
    serde_json::json!({
        "model": Provider::OpenAi.model(),
        "messages": [
            {
                "role": "system",
                "content": system_content
            },
            {
                "role": "user",
                "content": user_content
            }
        ]
    })
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Message content of the first choice.
    fn into_first_content(self) -> std::result::Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse {
                provider: Provider::OpenAi,
            })
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    #[tracing::instrument(skip_all, fields(model = Provider::OpenAi.model()))]
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String> {
        let response = self
            .send_completion_request(request.instructions, transcript_message(request.transcript))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        Ok(response.into_first_content()?)
    }
}
