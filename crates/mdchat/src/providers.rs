//! Provider selection from the model and api-key flags.

use std::sync::Arc;

use chat_provider::{ChatProvider, ProviderInitError};
use chat_provider_llm_api::{
    GoogleProvider, LlmProviderConfig, OpenAiProvider, DEEPSEEK_PROVIDER_ID, GOOGLE_PROVIDER_ID,
    OPENAI_PROVIDER_ID,
};
use chat_provider_mock::MockProvider;

pub const MOCK_PROVIDER_ID: &str = "mock";

/// Resolves `--model provider/model` plus `--api-key provider=key` into a
/// provider. Pure selection: no file or network side effects.
pub fn provider_for_spec(
    model_spec: &str,
    api_key_spec: &str,
) -> Result<Arc<dyn ChatProvider>, ProviderInitError> {
    let (model_provider, model) = split_spec(model_spec, '/');

    if model_provider == MOCK_PROVIDER_ID {
        return Ok(Arc::new(MockProvider::default()));
    }

    let (key_provider, key) = split_spec(api_key_spec, '=');
    if key_provider != model_provider {
        return Err(ProviderInitError::new(format!(
            "mismatched model and api key provider: {key_provider:?} != {model_provider:?}"
        )));
    }
    if key.is_empty() || model.is_empty() {
        return Err(ProviderInitError::new("missing api key or model"));
    }

    let config = LlmProviderConfig::new(key, model);
    match model_provider {
        OPENAI_PROVIDER_ID => Ok(Arc::new(OpenAiProvider::new(config)?)),
        DEEPSEEK_PROVIDER_ID => Ok(Arc::new(OpenAiProvider::deepseek(config)?)),
        GOOGLE_PROVIDER_ID => Ok(Arc::new(GoogleProvider::new(config)?)),
        unknown => Err(ProviderInitError::new(format!(
            "Unsupported provider '{unknown}'. Available providers: \
             {OPENAI_PROVIDER_ID}, {DEEPSEEK_PROVIDER_ID}, {GOOGLE_PROVIDER_ID}, \
             {MOCK_PROVIDER_ID}"
        ))),
    }
}

/// Splits `provider<sep>rest`, yielding empty parts when the separator is
/// absent so the caller's non-empty checks reject the spec.
fn split_spec(spec: &str, separator: char) -> (&str, &str) {
    match spec.split_once(separator) {
        Some((provider, rest)) => (provider, rest),
        None => ("", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::provider_for_spec;

    #[test]
    fn mock_resolves_without_credentials() {
        let provider = provider_for_spec("mock/anything", "").expect("mock should resolve");
        assert_eq!(provider.profile().provider_id, "mock");
    }

    #[test]
    fn known_providers_resolve() {
        let openai = provider_for_spec("openai/o3-mini", "openai=sk-test").expect("openai");
        assert_eq!(openai.profile().provider_id, "openai");
        assert_eq!(openai.profile().model_id, "o3-mini");

        let deepseek =
            provider_for_spec("deepseek/deepseek-chat", "deepseek=sk-test").expect("deepseek");
        assert_eq!(deepseek.profile().provider_id, "deepseek");

        let google =
            provider_for_spec("google/gemini-2.0-flash", "google=key").expect("google");
        assert_eq!(google.profile().provider_id, "google");
    }

    #[test]
    fn mismatched_providers_fail() {
        let error = provider_for_spec("openai/o3-mini", "google=key").unwrap_err();
        assert!(error.message().contains("mismatched"));
    }

    #[test]
    fn missing_parts_fail() {
        assert!(provider_for_spec("openai/", "openai=key").is_err());
        assert!(provider_for_spec("openai/o3-mini", "openai=").is_err());
        assert!(provider_for_spec("o3-mini", "openai=key").is_err());
    }

    #[test]
    fn unknown_provider_lists_available_ids() {
        let error = provider_for_spec("custom/model", "custom=key").unwrap_err();
        assert!(error.message().contains("Unsupported provider 'custom'"));
        assert!(error.message().contains("mock"));
    }
}
