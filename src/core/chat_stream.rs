use futures_util::StreamExt;
use memchr::memchr;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ChatChunk, ChatMessage, ChatOptions, ChatRequest};
use crate::core::error::ChatError;
use crate::utils::url::construct_api_url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    Chunk(String),
    Error(String),
    End,
}

pub type StreamSender = mpsc::UnboundedSender<(StreamMessage, u64)>;
pub type StreamReceiver = mpsc::UnboundedReceiver<(StreamMessage, u64)>;

/// Pull a readable message out of an error body, preferring Ollama's
/// `{"error": "..."}` shape.
fn extract_error_message(body: &str) -> String {
    let trimmed = body.trim();
    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| match value.get("error") {
            Some(serde_json::Value::String(text)) => Some(text.clone()),
            Some(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(|message| message.as_str())
                .map(str::to_owned),
            _ => None,
        })
        .unwrap_or_else(|| trimmed.to_string())
}

fn send_failure(tx: &StreamSender, stream_id: u64, error: ChatError) {
    warn!(stream_id, error = %error, "Chat stream failed");
    let _ = tx.send((StreamMessage::Error(error.to_string()), stream_id));
    let _ = tx.send((StreamMessage::End, stream_id));
}

/// Handle one NDJSON line. Returns `true` once the stream is finished.
fn process_ndjson_line(line: &str, tx: &StreamSender, stream_id: u64) -> bool {
    if line.is_empty() {
        return false;
    }

    match serde_json::from_str::<ChatChunk>(line) {
        Ok(chunk) => {
            if let Some(error) = chunk.error {
                send_failure(tx, stream_id, ChatError::StreamFailure(error));
                return true;
            }
            if let Some(message) = chunk.message {
                if !message.content.is_empty() {
                    let _ = tx.send((StreamMessage::Chunk(message.content), stream_id));
                }
            }
            if chunk.done {
                let _ = tx.send((StreamMessage::End, stream_id));
                return true;
            }
            false
        }
        Err(err) => {
            debug!(stream_id, error = %err, line, "Skipping unparseable stream line");
            false
        }
    }
}

/// Split complete lines off `buffer` and process them. Returns `true` once
/// the stream is finished.
fn drain_lines(buffer: &mut Vec<u8>, tx: &StreamSender, stream_id: u64) -> bool {
    while let Some(newline_pos) = memchr(b'\n', buffer) {
        let finished = match std::str::from_utf8(&buffer[..newline_pos]) {
            Ok(line) => process_ndjson_line(line.trim(), tx, stream_id),
            Err(err) => {
                warn!(stream_id, error = %err, "Invalid UTF-8 in stream");
                false
            }
        };
        buffer.drain(..=newline_pos);
        if finished {
            return true;
        }
    }
    false
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub server_url: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub options: ChatOptions,
    pub stream_id: u64,
}

async fn run_stream(params: StreamParams, tx: StreamSender) {
    let StreamParams {
        client,
        server_url,
        model,
        messages,
        options,
        stream_id,
    } = params;

    info!(stream_id, model = %model, turns = messages.len(), "Starting chat stream");

    let request = ChatRequest {
        model,
        messages,
        stream: true,
        options,
    };

    let chat_url = construct_api_url(&server_url, "api/chat");
    let response = match client.post(chat_url).json(&request).send().await {
        Ok(response) => response,
        Err(err) => {
            send_failure(&tx, stream_id, ChatError::from(err));
            return;
        }
    };

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        send_failure(
            &tx,
            stream_id,
            ChatError::HttpStatus {
                status,
                body: extract_error_message(&body),
            },
        );
        return;
    }

    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                buffer.extend_from_slice(&bytes);
                if drain_lines(&mut buffer, &tx, stream_id) {
                    debug!(stream_id, "Chat stream finished");
                    return;
                }
            }
            Err(err) => {
                send_failure(&tx, stream_id, ChatError::StreamFailure(err.to_string()));
                return;
            }
        }
    }

    // Body closed without a `done` line; flush whatever is left.
    if let Ok(rest) = std::str::from_utf8(&buffer) {
        if process_ndjson_line(rest.trim(), &tx, stream_id) {
            return;
        }
    }
    debug!(stream_id, "Chat stream closed by server");
    let _ = tx.send((StreamMessage::End, stream_id));
}

/// Spawns stream workers and owns the sending half of the relay channel.
/// The receiving half is drained by the chat loop, which is the only place
/// stream messages are applied to the app.
#[derive(Clone)]
pub struct ChatStreamService {
    tx: StreamSender,
}

impl ChatStreamService {
    pub fn new() -> (Self, StreamReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        tokio::spawn(run_stream(params, tx));
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, stream_id: u64) {
        let _ = self.tx.send((message, stream_id));
    }
}
