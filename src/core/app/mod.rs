//! Application state owned by the chat loop.
//!
//! [`App`] bundles the session (conversation, model selection, stream
//! state) with the display state. Background workers never touch it; their
//! results come back as [`AppAction`]s applied on the loop's own task.

use crate::core::config::Settings;
use crate::core::message::{AppMessageKind, Message};

pub mod actions;
pub mod conversation;
pub mod session;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand, ProbeRequest,
};
pub use conversation::Conversation;
pub use session::{ModelSelection, SessionContext, StreamState};
pub use ui_state::{PromptInput, ScrollState, UiState, PROMPT_MARKER};

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let mut app = Self {
            session: SessionContext::new(settings),
            ui: UiState::default(),
        };
        app.ui.markdown_enabled = settings.markdown;
        app.ui.push(Message::app_info(welcome_markdown()));
        app.add_app_message(
            AppMessageKind::Info,
            format!(
                "Connecting to model server at {}…",
                app.session.selection.server_url
            ),
        );
        app
    }

    pub fn add_app_message(&mut self, kind: AppMessageKind, content: impl Into<String>) {
        self.ui.push(Message::app(kind, content));
    }

    pub fn add_error(&mut self, error: impl std::fmt::Display) {
        self.add_app_message(AppMessageKind::Error, error.to_string());
    }

    /// Snapshot of what a probe worker needs to reach the current server.
    pub fn probe_request(&self) -> ProbeRequest {
        ProbeRequest {
            client: self.session.client.clone(),
            server_url: self.session.selection.server_url.clone(),
            timeout: self.session.probe_timeout,
        }
    }
}

fn welcome_markdown() -> String {
    let mut text = String::from(
        "# parley\n\nType a message to start chatting.\n\n## Commands\n",
    );
    for command in crate::commands::all_commands() {
        text.push_str(&format!("- `{}` - {}\n", command.usage, command.help));
    }
    text.push_str("- `quit` / `exit` - leave parley\n");
    text
}
