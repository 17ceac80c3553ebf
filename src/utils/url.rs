//! Helpers for building model-server endpoint URLs.
//!
//! Server URLs come from the command line or the config file and frequently
//! carry a trailing slash, so every endpoint is joined through
//! [`construct_api_url`].

/// Strip trailing slashes from a server URL.
///
/// ```
/// use parley::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:11434/"), "http://localhost:11434");
/// assert_eq!(normalize_base_url("http://localhost:11434"), "http://localhost:11434");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a server URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use parley::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:11434", "api/chat"),
///     "http://localhost:11434/api/chat"
/// );
/// assert_eq!(
///     construct_api_url("http://localhost:11434/", "/api/tags"),
///     "http://localhost:11434/api/tags"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        normalize_base_url(base_url),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_every_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://gpu-box:11434///"),
            "http://gpu-box:11434"
        );
        assert_eq!(normalize_base_url("  http://gpu-box:11434/ "), "http://gpu-box:11434");
        assert_eq!(normalize_base_url("///"), "");
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn construct_joins_with_single_slash() {
        assert_eq!(
            construct_api_url("http://127.0.0.1:11434", "api/tags"),
            "http://127.0.0.1:11434/api/tags"
        );
        assert_eq!(
            construct_api_url("http://127.0.0.1:11434//", "//api/chat"),
            "http://127.0.0.1:11434/api/chat"
        );
        assert_eq!(
            construct_api_url("http://proxy.local/ollama/", "api/tags"),
            "http://proxy.local/ollama/api/tags"
        );
    }
}
