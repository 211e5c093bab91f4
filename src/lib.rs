//! resumotube - Summarize YouTube videos from their transcripts
//!
//! Resolves a video's captions, flattens them into one transcript and asks
//! Gemini or OpenAI for a chapter-style summary.

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod transcript;

use thiserror::Error;

use crate::llm::LlmError;
use crate::transcript::TranscriptError;

/// Main error type for resumotube
#[derive(Error, Debug)]
pub enum ResumoError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Failed to fetch transcript: {0}")]
    FetchFailure(#[from] TranscriptError),

    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ResumoError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "resumotube";
