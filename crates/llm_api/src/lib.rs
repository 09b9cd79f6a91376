//! Streaming HTTP transport for LLM chat endpoints.
//!
//! Two wire dialects are covered: OpenAI-compatible chat completions
//! (also used by DeepSeek via its base URL) and Google Gemini
//! `streamGenerateContent`. Both deliver server-sent events; the shared
//! [`SseStreamParser`] turns byte chunks into complete `data:` payloads and
//! each client maps payloads to text deltas with tolerant JSON lookups.

mod cancel;
mod config;
mod error;
mod google;
mod openai;
mod sse;

pub use cancel::CancellationSignal;
pub use config::LlmApiConfig;
pub use error::LlmApiError;
pub use google::{text_from_payload, GoogleClient, DEFAULT_GEMINI_BASE_URL};
pub use openai::{delta_from_payload, OpenAiClient, DEEPSEEK_BASE_URL, DEFAULT_OPENAI_BASE_URL};
pub use sse::SseStreamParser;

/// Speaker tag for one wire-level history item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
    System,
}

/// One model-facing history item, independent of wire dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    #[must_use]
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}
