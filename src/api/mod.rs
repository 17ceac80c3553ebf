//! Wire payloads for the Ollama-compatible model-server API.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub options: ChatOptions,
}

/// One line of the newline-delimited JSON body returned by `/api/chat`.
#[derive(Deserialize, Debug, Default)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ModelDetails {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub parameter_size: Option<String>,
    #[serde(default)]
    pub quantization_level: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub details: Option<ModelDetails>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

pub mod models;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_ollama_shape() {
        let request = ChatRequest {
            model: "llama3".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            stream: true,
            options: ChatOptions {
                temperature: 0.5,
                top_p: 0.25,
            },
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "model": "llama3",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": true,
                "options": {"temperature": 0.5, "top_p": 0.25}
            })
        );
    }

    #[test]
    fn chat_chunk_tolerates_missing_fields() {
        let final_line: ChatChunk =
            serde_json::from_str(r#"{"model":"llama3","done":true,"eval_count":12}"#)
                .expect("parse");
        assert!(final_line.done);
        assert!(final_line.message.is_none());

        let error_line: ChatChunk =
            serde_json::from_str(r#"{"error":"model 'nope' not found"}"#).expect("parse");
        assert_eq!(error_line.error.as_deref(), Some("model 'nope' not found"));
    }

    #[test]
    fn tags_response_reads_model_names_and_details() {
        let body = r#"{"models":[
            {"name":"qwen3:30b-32k","size":18556701216,
             "details":{"family":"qwen3","parameter_size":"30.5B","quantization_level":"Q4_K_M"}},
            {"name":"llama3:8b"}
        ]}"#;
        let tags: TagsResponse = serde_json::from_str(body).expect("parse");
        let names: Vec<_> = tags.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["qwen3:30b-32k", "llama3:8b"]);
        let details = tags.models[0].details.as_ref().expect("details");
        assert_eq!(details.parameter_size.as_deref(), Some("30.5B"));
    }
}
