//! LLM module for resumotube
//!
//! Summary generation with Gemini or OpenAI.

mod client;
mod gemini;
mod openai;
mod prompts;

pub use client::{build_provider, LlmError, LlmProvider, Provider, SummaryRequest};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use prompts::{build_instructions, BASE_INSTRUCTION};
