//! OpenAI-compatible chat-completions streaming client.
//!
//! DeepSeek speaks the same dialect; select it with [`DEEPSEEK_BASE_URL`].

use reqwest::Client;
use serde_json::{json, Value};

use crate::cancel::{await_or_cancel, CancellationSignal};
use crate::config::LlmApiConfig;
use crate::error::{parse_error_message, LlmApiError};
use crate::sse::drive_stream;
use crate::{ChatTurn, TurnRole};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

#[derive(Debug)]
pub struct OpenAiClient {
    http: Client,
    config: LlmApiConfig,
}

impl OpenAiClient {
    pub fn new(config: LlmApiConfig) -> Result<Self, LlmApiError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmApiError::MissingApiKey);
        }
        if config.model.trim().is_empty() {
            return Err(LlmApiError::MissingModel);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(LlmApiError::ClientBuild)?;

        Ok(Self { http, config })
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    /// Builds the streaming chat-completions request body.
    #[must_use]
    pub fn build_payload(&self, turns: &[ChatTurn]) -> Value {
        let messages: Vec<Value> = turns
            .iter()
            .map(|turn| {
                json!({
                    "role": wire_role(turn.role),
                    "content": turn.text,
                })
            })
            .collect();

        json!({
            "model": self.config.model,
            "messages": messages,
            "stream": true,
            "reasoning_effort": "low",
        })
    }

    /// Streams the reply, handing each non-empty content delta to `on_delta`.
    pub async fn stream_with_handler<F>(
        &self,
        turns: &[ChatTurn],
        cancel: Option<&CancellationSignal>,
        mut on_delta: F,
    ) -> Result<(), LlmApiError>
    where
        F: FnMut(String),
    {
        let request = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.build_payload(turns));

        let response = await_or_cancel(request.send(), cancel).await??;
        let status = response.status();
        if !status.is_success() {
            let body = await_or_cancel(response.text(), cancel)
                .await?
                .unwrap_or_default();
            return Err(LlmApiError::Status {
                status,
                message: parse_error_message(status, &body),
            });
        }

        drive_stream(response, cancel, |payload| {
            if let Some(delta) = delta_from_payload(payload) {
                if !delta.is_empty() {
                    on_delta(delta);
                }
            }
        })
        .await
    }
}

fn wire_role(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "user",
        TurnRole::Assistant => "assistant",
        TurnRole::System => "system",
    }
}

/// Extracts the streamed content delta from one chat-completions event.
///
/// Unfamiliar payload shapes yield `None` rather than an error.
#[must_use]
pub fn delta_from_payload(payload: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(payload).ok()?;
    value
        .get("choices")?
        .as_array()?
        .first()?
        .get("delta")?
        .get("content")?
        .as_str()
        .map(ToString::to_string)
}
