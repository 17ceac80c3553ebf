use serde::{Deserialize, Serialize};

use crate::api::ChatMessage;

/// Role of a conversation turn as understood by the model server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of the conversation sent to the model. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn to_api_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role.as_str().to_string(),
            content: self.content.clone(),
        }
    }
}

/// Severity for app-authored messages rendered in the transcript but never
/// transmitted to the model server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppMessageKind {
    Info,
    Warning,
    Error,
}

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptRole {
    User,
    Assistant,
    App(AppMessageKind),
}

/// One entry of the scrollable log. Display only; the conversation sent to
/// the server lives in [`Conversation`](crate::core::app::conversation::Conversation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: TranscriptRole,
    pub content: String,
}

impl Message {
    pub fn new(role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::Assistant, content)
    }

    pub fn app(kind: AppMessageKind, content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::App(kind), content)
    }

    pub fn app_info(content: impl Into<String>) -> Self {
        Self::app(AppMessageKind::Info, content)
    }

    pub fn app_warning(content: impl Into<String>) -> Self {
        Self::app(AppMessageKind::Warning, content)
    }

    pub fn app_error(content: impl Into<String>) -> Self {
        Self::app(AppMessageKind::Error, content)
    }

    pub fn app_kind(&self) -> Option<AppMessageKind> {
        match self.role {
            TranscriptRole::App(kind) => Some(kind),
            _ => None,
        }
    }
}
