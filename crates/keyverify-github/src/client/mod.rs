//! GitHub REST client.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use async_trait::async_trait;
use keyverify_core::MembershipOracle;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::auth::TokenProvider;
use crate::config::GithubConfig;
use crate::error::{GithubError, GithubResult};

mod helpers;
mod http;

use helpers::public_member_url;
use http::{HttpBackend, MembershipOutcome};

/// User-Agent sent with every request. GitHub rejects requests without one.
pub const GITHUB_USER_AGENT: &str = concat!("keyverify/", env!("CARGO_PKG_VERSION"));

/// Client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: HttpBackend,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> GithubResult<Self> {
        let token_provider = config
            .token
            .as_ref()
            .map(TokenProvider::static_token)
            .unwrap_or_else(TokenProvider::from_env);

        Self::with_token_provider(config, token_provider)
    }

    pub fn with_token_provider(
        config: GithubConfig,
        token_provider: TokenProvider,
    ) -> GithubResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(GITHUB_USER_AGENT));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| GithubError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
                token_provider,
            },
        })
    }

    /// Whether `username` is a publicly visible member of `org`.
    ///
    /// Private members are indistinguishable from non-members here.
    pub async fn is_public_member(&self, org: &str, username: &str) -> GithubResult<bool> {
        let url = public_member_url(&self.http.base_url, org, username)?;
        debug!(url = %url, "checking public organization membership");

        let outcome = self.http.check_public_membership(&url).await?;
        Ok(outcome == MembershipOutcome::Member)
    }
}

#[async_trait]
impl MembershipOracle for GithubClient {
    type Error = GithubError;

    async fn is_member(&self, username: &str, org: &str) -> Result<bool, GithubError> {
        self.is_public_member(org, username).await
    }
}
