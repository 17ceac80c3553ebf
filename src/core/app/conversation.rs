//! Conversation history sent to the model server.

use std::collections::VecDeque;

use crate::api::ChatMessage;
use crate::core::message::{Role, Turn};

pub const DEFAULT_HISTORY_TURNS: usize = 10;

/// Ordered turns headed by exactly one system turn.
///
/// The system prompt lives in its own slot, so the head invariant holds by
/// construction: `/system` replaces it and `/clear` never touches it. Only
/// the most recent `history_limit` user/assistant turns are retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    system: Turn,
    turns: VecDeque<Turn>,
    history_limit: usize,
}

// Never empty: the system turn is always present.
#[allow(clippy::len_without_is_empty)]
impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self::with_history_limit(system_prompt, DEFAULT_HISTORY_TURNS)
    }

    pub fn with_history_limit(system_prompt: impl Into<String>, history_limit: usize) -> Self {
        Self {
            system: Turn::system(system_prompt),
            turns: VecDeque::new(),
            history_limit: history_limit.max(1),
        }
    }

    pub fn system_prompt(&self) -> &str {
        self.system.content()
    }

    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system = Turn::system(prompt);
    }

    /// Drop every user/assistant turn, keeping the system prompt.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Append a turn and trim the oldest turns beyond the history limit.
    /// A system turn replaces the head instead of being appended.
    pub fn push(&mut self, turn: Turn) {
        if turn.role() == Role::System {
            self.system = turn;
            return;
        }
        self.turns.push_back(turn);
        self.truncate(self.history_limit);
    }

    /// Keep the system turn plus the `keep` most recent turns.
    pub fn truncate(&mut self, keep: usize) {
        while self.turns.len() > keep {
            self.turns.pop_front();
        }
    }

    /// Number of turns including the system turn.
    pub fn len(&self) -> usize {
        self.turns.len() + 1
    }

    /// Whether any user or assistant turn follows the system turn.
    pub fn has_history(&self) -> bool {
        !self.turns.is_empty()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Every turn in send order, system turn first.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        std::iter::once(&self.system).chain(self.turns.iter())
    }

    /// Owned copy of the conversation in wire form, handed to a stream worker.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.iter().map(Turn::to_api_message).collect()
    }
}
