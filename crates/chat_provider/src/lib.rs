//! Minimal provider-agnostic contract for streaming one chat reply.
//!
//! This crate defines only the shared request/stream types. It excludes
//! provider transport details, wire payloads, and transcript persistence
//! concerns. A provider turns a message history into an ordered, finite
//! sequence of text fragments; transport failures mid-stream are surfaced
//! in-band as fragments prefixed with `Error: ` rather than as control flow.

use std::fmt;
use std::sync::{atomic::AtomicBool, Arc};

/// Shared cancellation flag for a streaming reply.
pub type CancelSignal = Arc<AtomicBool>;

/// Prefix carried by in-band error fragments.
pub const ERROR_FRAGMENT_PREFIX: &str = "Error: ";

/// Formats a transport failure as an in-band stream fragment.
#[must_use]
pub fn error_fragment(message: impl fmt::Display) -> String {
    format!("{ERROR_FRAGMENT_PREFIX}{message}")
}

/// Error returned while constructing/configuring a provider before any
/// streaming starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInitError {
    message: String,
}

impl ProviderInitError {
    /// Creates a new provider initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderInitError {}

impl From<String> for ProviderInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Provider-neutral speaker tag for one history message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Provider-neutral model-facing history item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }
}

/// Input required to start one streaming reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

/// Immutable metadata describing a chat provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Provider interface for streaming one reply.
pub trait ChatProvider: Send + Sync + 'static {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Streams the reply for `req`, delivering fragments in emission order.
    ///
    /// The fragment sequence is finite; cancellation via `cancel` may end it
    /// early. Transport failures after streaming begins are delivered as
    /// [`error_fragment`] text, so this method itself does not fail.
    fn respond(&self, req: ChatRequest, cancel: CancelSignal, emit: &mut dyn FnMut(String));
}

impl fmt::Debug for dyn ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatProvider")
            .field("profile", &self.profile())
            .finish()
    }
}
