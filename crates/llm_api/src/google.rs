//! Google Gemini `streamGenerateContent` client.

use reqwest::Client;
use serde_json::{json, Value};

use crate::cancel::{await_or_cancel, CancellationSignal};
use crate::config::LlmApiConfig;
use crate::error::{parse_error_message, LlmApiError};
use crate::sse::drive_stream;
use crate::{ChatTurn, TurnRole};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug)]
pub struct GoogleClient {
    http: Client,
    config: LlmApiConfig,
}

impl GoogleClient {
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
            .unwrap_or(DEFAULT_GEMINI_BASE_URL);
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Builds the request body. System turns become `systemInstruction`
    /// (last one wins); assistant turns use the wire role `model`.
    #[must_use]
    pub fn build_payload(&self, turns: &[ChatTurn]) -> Value {
        let mut system: Option<&str> = None;
        let mut contents = Vec::new();

        for turn in turns {
            match turn.role {
                TurnRole::System => system = Some(&turn.text),
                TurnRole::User | TurnRole::Assistant => contents.push(json!({
                    "role": if turn.role == TurnRole::Assistant { "model" } else { "user" },
                    "parts": [{"text": turn.text}],
                })),
            }
        }

        let mut payload = json!({ "contents": contents });
        if let Some(text) = system {
            payload["systemInstruction"] = json!({ "parts": [{"text": text}] });
        }
        payload
    }

    /// Streams the reply, handing each non-empty text delta to `on_delta`.
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
            .header("x-goog-api-key", &self.config.api_key)
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
            if let Some(text) = text_from_payload(payload) {
                if !text.is_empty() {
                    on_delta(text);
                }
            }
        })
        .await
    }
}

/// Joins the text parts of the first candidate in one stream event.
#[must_use]
pub fn text_from_payload(payload: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(payload).ok()?;
    let parts = value
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    Some(text)
}
