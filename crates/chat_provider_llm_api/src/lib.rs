//! HTTP-backed implementations of the shared `chat_provider` contract.
//!
//! Each provider blocks on a current-thread tokio runtime per reply, so the
//! synchronous contract stays free of async surface area. Transport failures
//! after construction are delivered in-band as `Error: ` fragments; only
//! configuration problems fail construction.

use std::time::Duration;

use chat_provider::{
    error_fragment, CancelSignal, ChatProvider, ChatRequest, MessageRole, ProviderInitError,
    ProviderProfile,
};
use llm_api::{ChatTurn, GoogleClient, LlmApiConfig, LlmApiError, OpenAiClient, TurnRole};

/// Stable provider identifiers used by CLI selection.
pub const OPENAI_PROVIDER_ID: &str = "openai";
pub const DEEPSEEK_PROVIDER_ID: &str = "deepseek";
pub const GOOGLE_PROVIDER_ID: &str = "google";

/// Upper bound on one whole streaming reply.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(180);

/// Runtime configuration shared by the HTTP providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl LlmProviderConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn into_llm_api_config(self) -> LlmApiConfig {
        let mut config = LlmApiConfig::new(self.api_key, self.model).with_timeout(self.timeout);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        config
    }
}

/// `ChatProvider` backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiProvider {
    provider_id: String,
    model: String,
    client: OpenAiClient,
}

impl OpenAiProvider {
    pub fn new(config: LlmProviderConfig) -> Result<Self, ProviderInitError> {
        Self::with_provider_id(OPENAI_PROVIDER_ID, config)
    }

    /// DeepSeek speaks the chat-completions dialect at its own base URL.
    pub fn deepseek(config: LlmProviderConfig) -> Result<Self, ProviderInitError> {
        let config = match config.base_url {
            Some(_) => config,
            None => config.with_base_url(llm_api::DEEPSEEK_BASE_URL),
        };
        Self::with_provider_id(DEEPSEEK_PROVIDER_ID, config)
    }

    fn with_provider_id(
        provider_id: &str,
        config: LlmProviderConfig,
    ) -> Result<Self, ProviderInitError> {
        let model = config.model.clone();
        let client = OpenAiClient::new(config.into_llm_api_config()).map_err(map_init_error)?;
        Ok(Self {
            provider_id: provider_id.to_string(),
            model,
            client,
        })
    }
}

impl ChatProvider for OpenAiProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: self.provider_id.clone(),
            model_id: self.model.clone(),
        }
    }

    fn respond(&self, req: ChatRequest, cancel: CancelSignal, emit: &mut dyn FnMut(String)) {
        let Some(runtime) = reply_runtime(emit) else {
            return;
        };
        let turns = wire_turns(&req);
        let result = runtime.block_on(self.client.stream_with_handler(
            &turns,
            Some(&cancel),
            |delta| emit(delta),
        ));
        report_stream_result(result, emit);
    }
}

/// `ChatProvider` backed by the Gemini streaming endpoint.
pub struct GoogleProvider {
    model: String,
    client: GoogleClient,
}

impl GoogleProvider {
    pub fn new(config: LlmProviderConfig) -> Result<Self, ProviderInitError> {
        let model = config.model.clone();
        let client = GoogleClient::new(config.into_llm_api_config()).map_err(map_init_error)?;
        Ok(Self { model, client })
    }
}

impl ChatProvider for GoogleProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: GOOGLE_PROVIDER_ID.to_string(),
            model_id: self.model.clone(),
        }
    }

    fn respond(&self, req: ChatRequest, cancel: CancelSignal, emit: &mut dyn FnMut(String)) {
        let Some(runtime) = reply_runtime(emit) else {
            return;
        };
        let turns = wire_turns(&req);
        let result = runtime.block_on(self.client.stream_with_handler(
            &turns,
            Some(&cancel),
            |delta| emit(delta),
        ));
        report_stream_result(result, emit);
    }
}

fn wire_turns(req: &ChatRequest) -> Vec<ChatTurn> {
    req.messages
        .iter()
        .map(|message| {
            let role = match message.role {
                MessageRole::User => TurnRole::User,
                MessageRole::Assistant => TurnRole::Assistant,
                MessageRole::System => TurnRole::System,
            };
            ChatTurn::new(role, message.text.clone())
        })
        .collect()
}

fn map_init_error(error: LlmApiError) -> ProviderInitError {
    ProviderInitError::new(error.to_string())
}

/// Builds the per-reply current-thread runtime the blocking contract runs on.
fn reply_runtime(emit: &mut dyn FnMut(String)) -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => Some(runtime),
        Err(error) => {
            emit(error_fragment(format!(
                "failed to initialize tokio runtime: {error}"
            )));
            None
        }
    }
}

/// Maps a finished stream onto the in-band error convention. Cancellation is
/// a silent early end of the fragment sequence, not an error.
fn report_stream_result(result: Result<(), LlmApiError>, emit: &mut dyn FnMut(String)) {
    match result {
        Ok(()) | Err(LlmApiError::Cancelled) => {}
        Err(error) => emit(error_fragment(error)),
    }
}

#[cfg(test)]
mod tests {
    use chat_provider::{ChatMessage, ChatRequest, MessageRole, ProviderInitError};

    use super::{
        wire_turns, GoogleProvider, LlmProviderConfig, OpenAiProvider, DEFAULT_REPLY_TIMEOUT,
    };
    use llm_api::TurnRole;

    #[test]
    fn config_defaults_bound_the_reply() {
        let config = LlmProviderConfig::new("key", "model");
        assert_eq!(config.timeout, DEFAULT_REPLY_TIMEOUT);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn blank_credentials_fail_construction() {
        let error = match OpenAiProvider::new(LlmProviderConfig::new(" ", "o3-mini")) {
            Ok(_) => panic!("blank key should fail"),
            Err(error) => error,
        };
        assert_eq!(error, ProviderInitError::new("missing API key"));

        assert!(GoogleProvider::new(LlmProviderConfig::new("key", "")).is_err());
    }

    #[test]
    fn profiles_carry_provider_and_model_ids() {
        use chat_provider::ChatProvider;

        let openai = OpenAiProvider::new(LlmProviderConfig::new("key", "o3-mini")).expect("provider");
        assert_eq!(openai.profile().provider_id, "openai");
        assert_eq!(openai.profile().model_id, "o3-mini");

        let deepseek =
            OpenAiProvider::deepseek(LlmProviderConfig::new("key", "deepseek-chat")).expect("provider");
        assert_eq!(deepseek.profile().provider_id, "deepseek");

        let google =
            GoogleProvider::new(LlmProviderConfig::new("key", "gemini-2.0-flash")).expect("provider");
        assert_eq!(google.profile().provider_id, "google");
    }

    #[test]
    fn wire_turns_preserve_order_and_roles() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("be terse"),
            ChatMessage::user("hi"),
            ChatMessage::new(MessageRole::Assistant, "hello"),
        ]);
        let turns = wire_turns(&request);

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, TurnRole::System);
        assert_eq!(turns[1].role, TurnRole::User);
        assert_eq!(turns[2].role, TurnRole::Assistant);
        assert_eq!(turns[2].text, "hello");
    }
}
