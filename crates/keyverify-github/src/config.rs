//! Client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for [`crate::GithubClient`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Authentication token.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl GithubConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `GITHUB_API_URL` | REST API base URL |
    /// | `GITHUB_TOKEN` / `GH_TOKEN` | Authentication token |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("GITHUB_API_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_api_url),
            token: crate::auth::TokenProvider::from_env()
                .token()
                .map(String::from),
            timeout_secs: default_timeout(),
        }
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = GithubConfig::default();
        assert_eq!(config.url, "https://api.github.com");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: GithubConfig =
            serde_json::from_str(r#"{"url": "https://ghe.example.com/api/v3"}"#).unwrap();
        assert_eq!(config.url, "https://ghe.example.com/api/v3");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_serialize_never_writes_token() {
        let config = GithubConfig::default().with_token("ghp_secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ghp_secret"));
        assert!(!format!("{:?}", config).contains("ghp_secret"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("GITHUB_API_URL", "http://localhost:9999");
        std::env::set_var("GITHUB_TOKEN", "env-token");
        let config = GithubConfig::from_env();
        std::env::remove_var("GITHUB_API_URL");
        std::env::remove_var("GITHUB_TOKEN");

        assert_eq!(config.url, "http://localhost:9999");
        assert_eq!(config.token.as_deref(), Some("env-token"));
    }
}
