//! Error taxonomy for chat-session failures.
//!
//! Every variant is recoverable: the chat loop renders it as an app error in
//! the transcript and keeps running.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The model server could not be reached (refused, DNS, timeout).
    ConnectionUnavailable(String),
    /// The model server answered with a non-success status.
    HttpStatus { status: u16, body: String },
    /// No successful probe has happened yet, so there is nothing to talk to.
    ModelUninitialized,
    /// A response stream broke off or reported an error mid-flight.
    StreamFailure(String),
    UnknownCommand(String),
    /// `/model` named something missing from the last probe result.
    InvalidModelName(String),
    /// A command was invoked without its required argument.
    Usage(&'static str),
    /// A submission arrived while a response was still streaming.
    StreamBusy,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::ConnectionUnavailable(reason) => {
                write!(f, "Cannot reach the model server: {reason}")
            }
            ChatError::HttpStatus { status, body } => {
                if body.trim().is_empty() {
                    write!(f, "Model server responded with HTTP {status}")
                } else {
                    write!(f, "Model server responded with HTTP {status}: {}", body.trim())
                }
            }
            ChatError::ModelUninitialized => write!(
                f,
                "The model is not initialized. Check that the server is running (`ollama serve`) and use /reconnect."
            ),
            ChatError::StreamFailure(reason) => write!(f, "Response stream failed: {reason}"),
            ChatError::UnknownCommand(command) => {
                write!(f, "Unknown command: {command}. Type /help for the command list.")
            }
            ChatError::InvalidModelName(name) => write!(
                f,
                "Model '{name}' not found. Use /models to see the available models."
            ),
            ChatError::Usage(usage) => write!(f, "Usage: {usage}"),
            ChatError::StreamBusy => write!(
                f,
                "A response is still streaming. Wait for it to finish before sending more."
            ),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ChatError::HttpStatus {
                status: status.as_u16(),
                body: String::new(),
            }
        } else if err.is_decode() || err.is_body() {
            ChatError::StreamFailure(err.to_string())
        } else {
            ChatError::ConnectionUnavailable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_omits_empty_body() {
        let err = ChatError::HttpStatus {
            status: 503,
            body: "  ".to_string(),
        };
        assert_eq!(err.to_string(), "Model server responded with HTTP 503");

        let err = ChatError::HttpStatus {
            status: 404,
            body: "{\"error\":\"not found\"}\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Model server responded with HTTP 404: {\"error\":\"not found\"}"
        );
    }

    #[test]
    fn invalid_model_points_at_models_command() {
        let message = ChatError::InvalidModelName("ghost:7b".to_string()).to_string();
        assert!(message.contains("ghost:7b"));
        assert!(message.contains("/models"));
    }
}
