//! GitHub organization membership lookups.
//!
//! [`GithubClient`] implements [`keyverify_core::MembershipOracle`] on top of
//! the public members endpoint:
//!
//! ```no_run
//! use keyverify_github::{GithubClient, GithubConfig};
//!
//! # async fn example() -> Result<(), keyverify_github::GithubError> {
//! let client = GithubClient::new(GithubConfig::from_env())?;
//! let member = client.is_public_member("acme", "octocat").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `GITHUB_API_URL` | API base URL (default: `https://api.github.com`) |
//! | `GITHUB_TOKEN` | Authentication token |
//! | `GH_TOKEN` | Fallback when `GITHUB_TOKEN` is unset |

pub mod auth;
pub mod client;
pub mod config;
pub mod error;

pub use auth::TokenProvider;
pub use client::{GithubClient, GITHUB_USER_AGENT};
pub use config::GithubConfig;
pub use error::{GithubError, GithubResult};
