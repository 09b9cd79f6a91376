//! Markdown transcript persistence for chat conversations.
//!
//! A transcript is a human-readable markdown file: an optional `---` front
//! matter block carrying session metadata, followed by `# User` /
//! `# Assistant` / `# System` sections in dialogue order. Parsing is total —
//! malformed regions degrade to plain content instead of failing — and
//! writing is append-only so a crash mid-stream leaves a parseable prefix.

mod error;
mod parser;
mod store;
mod turn;
mod writer;

pub use error::TranscriptError;
pub use parser::parse;
pub use store::TranscriptStore;
pub use turn::{Conversation, Role, Turn};
pub use writer::TranscriptWriter;
