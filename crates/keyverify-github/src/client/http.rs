//! HTTP layer: request construction and status mapping.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use tracing::debug;

use crate::auth::TokenProvider;
use crate::error::{GithubError, GithubResult};

use super::helpers::error_message;

const ACCEPT_VALUE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// Outcome of a public membership lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MembershipOutcome {
    Member,
    NotMember,
}

/// HTTP backend (holds reqwest client, auth, base URL).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) token_provider: TokenProvider,
}

impl HttpBackend {
    /// 204 => Member, 404 => NotMember; everything else is an error.
    pub(crate) async fn check_public_membership(
        &self,
        url: &str,
    ) -> GithubResult<MembershipOutcome> {
        let response = self.get(url).await?;
        let status = response.status();
        debug!(status = status.as_u16(), "membership lookup answered");

        match status {
            StatusCode::NO_CONTENT => Ok(MembershipOutcome::Member),
            StatusCode::NOT_FOUND => Ok(MembershipOutcome::NotMember),
            _ => Err(map_error(response).await),
        }
    }

    /// Make a single GET request. No retries.
    async fn get(&self, url: &str) -> GithubResult<Response> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_VALUE)
            .header(API_VERSION_HEADER, API_VERSION);

        if let Some(token) = self.token_provider.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        Ok(request.send().await?)
    }
}

/// Map a non-success response to an error.
async fn map_error(response: Response) -> GithubError {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 => GithubError::Unauthorized {
            message: error_message(&body).unwrap_or_else(|| "invalid or expired token".to_string()),
        },

        403 | 429 => {
            let exhausted = headers
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.trim() == "0");
            let retry_after = headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);

            if exhausted || retry_after.is_some() || status == StatusCode::TOO_MANY_REQUESTS {
                GithubError::RateLimited { retry_after }
            } else {
                GithubError::Forbidden {
                    message: error_message(&body).unwrap_or_else(|| status.to_string()),
                }
            }
        }

        code => GithubError::Network {
            message: format!(
                "HTTP {}: {}",
                code,
                error_message(&body).unwrap_or_else(|| status.to_string())
            ),
        },
    }
}
