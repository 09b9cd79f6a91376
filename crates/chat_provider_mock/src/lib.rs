//! Deterministic streaming provider for local runs and tests.

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use chat_provider::{CancelSignal, ChatProvider, ChatRequest, ProviderProfile};

/// Streams a fixed chunk list, split at whitespace boundaries so consumers
/// exercise the same fragment cadence a network stream produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProvider {
    chunks: Vec<String>,
    token_delay: Duration,
}

impl MockProvider {
    #[must_use]
    pub fn new(chunks: Vec<String>) -> Self {
        Self {
            chunks,
            token_delay: Duration::from_millis(Self::TOKEN_DELAY_MS),
        }
    }

    /// Removes pacing delays. Tests use this to stream instantly.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.token_delay = Duration::ZERO;
        self
    }

    const TOKEN_DELAY_MS: u64 = 40;
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(vec![
            "## Mocked reply\n".to_string(),
            "A streaming demonstration of **markdown rendering** with deterministic output.\n".to_string(),
            "\n".to_string(),
            "- Inline code: `mdchat --model mock/mock`.\n".to_string(),
            "- *Emphasis* and ~~strikethrough~~ samples.\n".to_string(),
            "- A [link](https://example.com) for good measure.\n".to_string(),
            "\n".to_string(),
            "```rust\n".to_string(),
            "fn main() {\n".to_string(),
            "    println!(\"Hello, Markdown\");\n".to_string(),
            "}\n".to_string(),
            "```\n".to_string(),
            "\n".to_string(),
            "> Streaming completes with the final render left on screen.\n".to_string(),
            "Completed.\n".to_string(),
        ])
    }
}

impl ChatProvider for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: "mock".to_string(),
            model_id: "mock".to_string(),
        }
    }

    fn respond(&self, req: ChatRequest, cancel: CancelSignal, emit: &mut dyn FnMut(String)) {
        let _ = req;

        for chunk in &self.chunks {
            let mut pending_token = String::new();
            for ch in chunk.chars() {
                pending_token.push(ch);

                if matches!(ch, ' ' | '\n') {
                    if cancel.load(Ordering::SeqCst) {
                        return;
                    }
                    emit(std::mem::take(&mut pending_token));
                    self.pace();
                }
            }

            if !pending_token.is_empty() {
                if cancel.load(Ordering::SeqCst) {
                    return;
                }
                emit(pending_token);
                self.pace();
            }
        }
    }
}

impl MockProvider {
    fn pace(&self) {
        if !self.token_delay.is_zero() {
            thread::sleep(self.token_delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use chat_provider::{CancelSignal, ChatMessage, ChatProvider, ChatRequest};

    use super::MockProvider;

    fn request() -> ChatRequest {
        ChatRequest::new(vec![ChatMessage::user("hi")])
    }

    fn collect(provider: &MockProvider, cancel: CancelSignal) -> Vec<String> {
        let mut fragments = Vec::new();
        provider.respond(request(), cancel, &mut |fragment| fragments.push(fragment));
        fragments
    }

    #[test]
    fn fragments_concatenate_to_the_chunk_text() {
        let provider =
            MockProvider::new(vec!["first chunk\n".to_string(), "second".to_string()])
                .without_delays();
        let fragments = collect(&provider, Arc::new(AtomicBool::new(false)));

        assert_eq!(fragments.concat(), "first chunk\nsecond");
        // Whitespace boundaries end each fragment except a trailing partial.
        assert_eq!(fragments[0], "first ");
        assert_eq!(fragments[1], "chunk\n");
        assert_eq!(fragments[2], "second");
    }

    #[test]
    fn cancellation_stops_emission() {
        let provider = MockProvider::default().without_delays();
        let cancel: CancelSignal = Arc::new(AtomicBool::new(false));
        cancel.store(true, Ordering::SeqCst);

        let fragments = collect(&provider, cancel);
        assert!(fragments.is_empty());
    }

    #[test]
    fn profile_identifies_the_mock() {
        let profile = MockProvider::default().profile();
        assert_eq!(profile.provider_id, "mock");
        assert_eq!(profile.model_id, "mock");
    }
}
