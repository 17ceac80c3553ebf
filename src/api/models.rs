use std::time::Duration;

use tracing::{debug, warn};

use crate::api::TagsResponse;
use crate::core::error::ChatError;
use crate::utils::url::construct_api_url;

/// Outcome of a health check against the model server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub available: bool,
    pub model_names: Vec<String>,
    /// Why the server was judged unavailable, for display only.
    pub failure: Option<ChatError>,
}

impl ProbeResult {
    pub fn unavailable(reason: ChatError) -> Self {
        Self {
            available: false,
            model_names: Vec::new(),
            failure: Some(reason),
        }
    }

    pub fn has_model(&self, name: &str) -> bool {
        self.model_names.iter().any(|model| model == name)
    }
}

pub async fn fetch_models(
    client: &reqwest::Client,
    server_url: &str,
    timeout: Duration,
) -> Result<TagsResponse, ChatError> {
    let tags_url = construct_api_url(server_url, "api/tags");
    let response = client.get(tags_url).timeout(timeout).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ChatError::HttpStatus { status, body });
    }

    let tags = response.json::<TagsResponse>().await?;
    Ok(tags)
}

/// Check that the server answers `/api/tags` within `timeout` and collect its
/// model names. Never fails: any problem yields an unavailable result.
pub async fn probe(client: &reqwest::Client, server_url: &str, timeout: Duration) -> ProbeResult {
    match fetch_models(client, server_url, timeout).await {
        Ok(tags) => {
            let model_names: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
            debug!(server_url, models = model_names.len(), "Model server probe succeeded");
            ProbeResult {
                available: true,
                model_names,
                failure: None,
            }
        }
        Err(err) => {
            warn!(server_url, error = %err, "Model server probe failed");
            ProbeResult::unavailable(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{serve_once, serve_silently, unused_local_url};

    const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

    #[tokio::test]
    async fn probe_collects_model_names() {
        let body = r#"{"models":[{"name":"qwen3:30b-32k"},{"name":"llama3:8b"}]}"#;
        let (url, _request) = serve_once(200, "application/json", body.to_string()).await;

        let result = probe(&reqwest::Client::new(), &url, PROBE_TIMEOUT).await;

        assert!(result.available);
        assert_eq!(result.model_names, ["qwen3:30b-32k", "llama3:8b"]);
        assert!(result.failure.is_none());
        assert!(result.has_model("llama3:8b"));
        assert!(!result.has_model("llama3"));
    }

    #[tokio::test]
    async fn probe_hits_tags_endpoint() {
        let (url, request) = serve_once(200, "application/json", "{}".to_string()).await;

        let result = probe(&reqwest::Client::new(), &format!("{url}/"), PROBE_TIMEOUT).await;

        assert!(result.available);
        assert!(result.model_names.is_empty());
        let request = request.await.expect("server task").expect("request");
        assert!(request.request_line.starts_with("GET /api/tags "));
    }

    #[tokio::test]
    async fn probe_reports_non_success_status() {
        let (url, _request) = serve_once(500, "text/plain", "boom".to_string()).await;

        let result = probe(&reqwest::Client::new(), &url, PROBE_TIMEOUT).await;

        assert!(!result.available);
        assert!(result.model_names.is_empty());
        assert_eq!(
            result.failure,
            Some(ChatError::HttpStatus {
                status: 500,
                body: "boom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn probe_unreachable_server_is_unavailable() {
        let url = unused_local_url().await;

        let result = probe(&reqwest::Client::new(), &url, PROBE_TIMEOUT).await;

        assert!(!result.available);
        assert!(result.model_names.is_empty());
        assert!(matches!(
            result.failure,
            Some(ChatError::ConnectionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn probe_gives_up_after_timeout() {
        let url = serve_silently().await;

        let started = std::time::Instant::now();
        let result = probe(&reqwest::Client::new(), &url, Duration::from_millis(200)).await;

        assert!(!result.available);
        assert!(result.model_names.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn probe_treats_garbage_body_as_unavailable() {
        let (url, _request) = serve_once(200, "application/json", "not json".to_string()).await;

        let result = probe(&reqwest::Client::new(), &url, PROBE_TIMEOUT).await;

        assert!(!result.available);
        assert!(result.model_names.is_empty());
    }
}
