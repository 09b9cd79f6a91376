use std::time::Duration;

/// Transport configuration shared by all wire dialects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmApiConfig {
    /// Credential passed to the endpoint (bearer token or API key header).
    pub api_key: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Base URL override. Each client supplies its dialect default.
    pub base_url: Option<String>,
    /// Upper bound on the whole streaming reply.
    pub timeout: Option<Duration>,
}

impl LlmApiConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
