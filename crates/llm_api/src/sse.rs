use futures_util::StreamExt;
use reqwest::Response;

use crate::cancel::{await_or_cancel, CancellationSignal};
use crate::error::LlmApiError;

/// Incremental parser for SSE text streams.
///
/// Feed arbitrary byte chunks; complete `data:` payloads come out once their
/// terminating blank line arrives. `[DONE]` sentinels and empty payloads are
/// dropped.
#[derive(Debug, Default)]
pub struct SseStreamParser {
    buffer: String,
}

impl SseStreamParser {
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        let mut payloads = Vec::new();

        while let Some(split) = self.buffer.find("\n\n") {
            let frame = self.buffer[..split].to_string();
            self.buffer.drain(0..split + 2);

            if let Some(payload) = extract_data_payload(&frame) {
                if payload == "[DONE]" || payload.is_empty() {
                    continue;
                }
                payloads.push(payload);
            }
        }

        payloads
    }

    /// Parse a complete SSE payload string in one shot.
    #[must_use]
    pub fn parse_frames(input: &str) -> Vec<String> {
        let mut parser = Self::default();
        parser.feed(input.as_bytes())
    }

    #[must_use]
    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}

fn extract_data_payload(frame: &str) -> Option<String> {
    let data_lines: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect();

    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

/// Drains a streaming response, handing each complete payload to the caller.
pub(crate) async fn drive_stream<F>(
    response: Response,
    cancel: Option<&CancellationSignal>,
    mut on_payload: F,
) -> Result<(), LlmApiError>
where
    F: FnMut(&str),
{
    let mut bytes = response.bytes_stream();
    let mut parser = SseStreamParser::default();

    loop {
        let Some(chunk) = await_or_cancel(bytes.next(), cancel).await? else {
            break;
        };
        let chunk = chunk?;
        for payload in parser.feed(&chunk) {
            on_payload(&payload);
        }
    }

    Ok(())
}
