mod input;
mod streaming;

use std::time::Duration;

use tokio::sync::mpsc;

use super::App;
use crate::api::models::ProbeResult;
use crate::core::chat_stream::{StreamMessage, StreamParams};

pub enum AppAction {
    AppendResponseChunk { content: String, stream_id: u64 },
    StreamErrored { message: String, stream_id: u64 },
    StreamCompleted { stream_id: u64 },
    ProbeCompleted { result: ProbeResult },
    SubmitInput,
    InsertChar { ch: char },
    InsertText { text: String },
    Backspace,
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ClearInput,
    ScrollUp { lines: u16 },
    ScrollDown { lines: u16 },
    ScrollToTop,
    ScrollToBottom,
    ToggleMarkdown,
    Quit,
}

impl AppAction {
    /// Translate a message relayed from a stream worker.
    pub fn from_stream(message: StreamMessage, stream_id: u64) -> Self {
        match message {
            StreamMessage::Chunk(content) => AppAction::AppendResponseChunk { content, stream_id },
            StreamMessage::Error(message) => AppAction::StreamErrored { message, stream_id },
            StreamMessage::End => AppAction::StreamCompleted { stream_id },
        }
    }
}

/// Everything a probe worker needs, detached from the app.
#[derive(Clone, Debug)]
pub struct ProbeRequest {
    pub client: reqwest::Client,
    pub server_url: String,
    pub timeout: Duration,
}

/// Side effects requested by an action, carried out by the chat loop.
pub enum AppCommand {
    SpawnStream(StreamParams),
    ProbeServer(ProbeRequest),
}

/// Lets background tasks post actions back to the chat loop.
#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AppAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action))
        .collect()
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::AppendResponseChunk { .. }
        | AppAction::StreamErrored { .. }
        | AppAction::StreamCompleted { .. }
        | AppAction::ProbeCompleted { .. } => streaming::handle_streaming_action(app, action),

        AppAction::SubmitInput
        | AppAction::InsertChar { .. }
        | AppAction::InsertText { .. }
        | AppAction::Backspace
        | AppAction::DeleteForward
        | AppAction::CursorLeft
        | AppAction::CursorRight
        | AppAction::CursorHome
        | AppAction::CursorEnd
        | AppAction::ClearInput
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::ScrollToTop
        | AppAction::ScrollToBottom
        | AppAction::ToggleMarkdown
        | AppAction::Quit => input::handle_input_action(app, action),
    }
}
