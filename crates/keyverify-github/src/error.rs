//! Error types for the GitHub client.

use std::time::Duration;

/// GitHub API errors.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// Token missing, invalid or expired.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The token lacks access to the resource.
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// Primary or secondary rate limit hit.
    #[error("rate limited: retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Transport failure or unexpected status.
    #[error("network error: {message}")]
    Network { message: String },

    /// The response could not be interpreted.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for GitHub operations.
pub type GithubResult<T> = Result<T, GithubError>;
