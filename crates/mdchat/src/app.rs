//! Application flow: transcript in, streamed reply out.

use std::fs;
use std::io::{self, Read};
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::thread;

use chat_provider::{CancelSignal, ChatMessage, ChatProvider, ChatRequest, MessageRole};
use mdstream::{is_terminal, new_printer, EnvConfig, Printer, STDIN_FD};
use transcript::{Conversation, Role, TranscriptStore};

use crate::args::Args;
use crate::editor;
use crate::providers;

pub fn run(args: Args) -> io::Result<()> {
    if args.clear {
        TranscriptStore::remove(&args.history_file).map_err(io::Error::other)?;
    }
    if args.editor {
        return Err(editor::open_in_editor(&args.history_file));
    }

    // Provider selection fails before any file is touched.
    let provider =
        providers::provider_for_spec(&args.model, &args.api_key).map_err(io::Error::other)?;

    if let Some(parent) = args.history_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut store = TranscriptStore::open(&args.history_file).map_err(io::Error::other)?;
    let mut printer = new_printer(&EnvConfig::from_env());

    let user_message = user_message_from(&args.message, read_piped_stdin());
    chat(
        &mut store,
        printer.as_mut(),
        provider,
        &args.system_prompt,
        &user_message,
    )
}

/// Runs one exchange: persist the prompt turns, stream the reply from a
/// worker thread, and write each fragment to the transcript before rendering
/// it.
pub fn chat(
    store: &mut TranscriptStore,
    printer: &mut dyn Printer,
    provider: Arc<dyn ChatProvider>,
    system_prompt: &str,
    user_message: &str,
) -> io::Result<()> {
    if store.conversation().is_empty() {
        store.append_system(system_prompt).map_err(io::Error::other)?;
    }
    store.append_user(user_message).map_err(io::Error::other)?;

    let request = request_from(store.conversation());
    store.begin_assistant_turn().map_err(io::Error::other)?;

    let cancel: CancelSignal = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<String>();
    let worker = thread::Builder::new()
        .name("reply-stream".to_string())
        .spawn(move || {
            let mut emit = |fragment: String| {
                let _ = tx.send(fragment);
            };
            provider.respond(request, cancel, &mut emit);
        })?;

    for fragment in rx {
        store.append_fragment(&fragment).map_err(io::Error::other)?;
        printer.print(&fragment)?;
    }
    let _ = worker.join();

    store.finalize_turn().map_err(io::Error::other)?;
    printer.close()
}

fn request_from(conversation: &Conversation) -> ChatRequest {
    let messages = conversation
        .turns()
        .iter()
        .map(|turn| {
            let role = match turn.role {
                Role::User => MessageRole::User,
                Role::Assistant => MessageRole::Assistant,
                Role::System => MessageRole::System,
            };
            ChatMessage::new(role, turn.content.clone())
        })
        .collect();
    ChatRequest::new(messages)
}

/// Positional words first, then piped input separated by a blank line.
pub fn user_message_from(words: &[String], piped: Option<String>) -> String {
    let mut message = words.join(" ");
    if let Some(input) = piped {
        if !input.is_empty() {
            if !message.is_empty() {
                message.push_str("\n\n");
            }
            message.push_str(&input);
        }
    }
    message
}

fn read_piped_stdin() -> Option<String> {
    if is_terminal(STDIN_FD) {
        return None;
    }
    let mut input = String::new();
    io::stdin().read_to_string(&mut input).ok()?;
    Some(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use chat_provider::MessageRole;
    use transcript::parse;

    use super::{request_from, user_message_from};

    #[test]
    fn request_carries_all_turns_in_order() {
        let conversation = parse("# System\n\nbe terse\n\n# User\n\nhi\n\n# Assistant\n\nhello\n");
        let request = request_from(&conversation);
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
        assert_eq!(request.messages[1].text, "hi");
        assert_eq!(request.messages[2].role, MessageRole::Assistant);
    }

    #[test]
    fn piped_input_appends_after_blank_line() {
        let words = vec!["explain".to_string(), "this".to_string()];
        let message = user_message_from(&words, Some("fn main() {}".to_string()));
        assert_eq!(message, "explain this\n\nfn main() {}");
    }

    #[test]
    fn piped_input_alone_has_no_separator() {
        let message = user_message_from(&[], Some("data".to_string()));
        assert_eq!(message, "data");
    }

    #[test]
    fn empty_pipe_changes_nothing() {
        let words = vec!["hi".to_string()];
        assert_eq!(user_message_from(&words, Some(String::new())), "hi");
        assert_eq!(user_message_from(&words, None), "hi");
    }
}
