use std::time::Duration;

use crate::api::models::ProbeResult;
use crate::api::ChatOptions;
use crate::core::app::conversation::Conversation;
use crate::core::config::Settings;

/// The model the session talks to. Lives for the process only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub name: String,
    pub server_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Idle,
    Streaming(u64),
}

/// Session-level state owned by the UI loop: what is being said, to which
/// model, and whether a response is currently arriving.
pub struct SessionContext {
    pub client: reqwest::Client,
    pub selection: ModelSelection,
    pub conversation: Conversation,
    pub options: ChatOptions,
    pub probe_timeout: Duration,
    pub stream_state: StreamState,
    /// Most recent probe outcome; `None` until the first probe completes.
    pub last_probe: Option<ProbeResult>,
    default_system_prompt: String,
    last_stream_id: u64,
}

impl SessionContext {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            selection: ModelSelection {
                name: settings.model.clone(),
                server_url: settings.server_url.clone(),
            },
            conversation: Conversation::with_history_limit(
                settings.system_prompt.clone(),
                settings.history_turns,
            ),
            options: settings.options,
            probe_timeout: settings.probe_timeout,
            stream_state: StreamState::Idle,
            last_probe: None,
            default_system_prompt: settings.system_prompt.clone(),
            last_stream_id: 0,
        }
    }

    pub fn default_system_prompt(&self) -> &str {
        &self.default_system_prompt
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.stream_state, StreamState::Streaming(_))
    }

    /// A model is usable once a probe has reached the server.
    pub fn model_ready(&self) -> bool {
        self.last_probe
            .as_ref()
            .is_some_and(|probe| probe.available)
    }

    pub fn known_models(&self) -> &[String] {
        self.last_probe
            .as_ref()
            .map(|probe| probe.model_names.as_slice())
            .unwrap_or_default()
    }

    /// Move to `Streaming` with a fresh request id.
    pub fn begin_stream(&mut self) -> u64 {
        self.last_stream_id += 1;
        self.stream_state = StreamState::Streaming(self.last_stream_id);
        self.last_stream_id
    }

    pub fn is_current_stream(&self, stream_id: u64) -> bool {
        self.stream_state == StreamState::Streaming(stream_id)
    }

    pub fn finish_stream(&mut self) {
        self.stream_state = StreamState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_ids_increase_and_gate_messages() {
        let mut session = SessionContext::new(&Settings::default());
        assert!(!session.is_streaming());

        let first = session.begin_stream();
        assert!(session.is_current_stream(first));
        session.finish_stream();
        assert!(!session.is_current_stream(first));

        let second = session.begin_stream();
        assert!(second > first);
        assert!(!session.is_current_stream(first));
    }

    #[test]
    fn model_ready_requires_available_probe() {
        let mut session = SessionContext::new(&Settings::default());
        assert!(!session.model_ready());
        assert!(session.known_models().is_empty());

        session.last_probe = Some(ProbeResult {
            available: true,
            model_names: vec!["llama3:8b".to_string()],
            failure: None,
        });
        assert!(session.model_ready());
        assert_eq!(session.known_models(), ["llama3:8b"]);
    }
}
