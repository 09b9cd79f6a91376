use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmApiError {
    #[error("missing API key")]
    MissingApiKey,

    #[error("missing model identifier")]
    MissingModel,

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("stream cancelled")]
    Cancelled,
}

/// Pulls a human-readable message out of an error response body, falling
/// back to the raw body or the status reason when the shape is unfamiliar.
pub(crate) fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let message = value
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(|message| message.as_str())
            .map(str::trim)
            .filter(|message| !message.is_empty());
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::parse_error_message;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"error":{"message":"invalid api key","type":"auth"}}"#;
        assert_eq!(
            parse_error_message(StatusCode::UNAUTHORIZED, body),
            "invalid api key"
        );
    }

    #[test]
    fn falls_back_to_raw_body_then_status_reason() {
        assert_eq!(
            parse_error_message(StatusCode::BAD_GATEWAY, "upstream exploded"),
            "upstream exploded"
        );
        assert_eq!(
            parse_error_message(StatusCode::BAD_GATEWAY, "  "),
            "Bad Gateway"
        );
    }
}
