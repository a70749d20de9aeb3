//! Token authentication for the GitHub API.

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Token provider for GitHub authentication.
#[derive(Clone, PartialEq, Eq)]
pub enum TokenProvider {
    /// Static token (from config or env).
    Static(String),

    /// No authentication.
    None,
}

impl TokenProvider {
    /// Create a static token provider.
    pub fn static_token(token: impl Into<String>) -> Self {
        Self::Static(token.into())
    }

    /// Create from environment variables.
    ///
    /// Checks `GITHUB_TOKEN`, then `GH_TOKEN`. Empty values are ignored.
    pub fn from_env() -> Self {
        TOKEN_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|token| !token.is_empty())
            .map_or(Self::None, Self::Static)
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Static(token) => Some(token),
            Self::None => None,
        }
    }
}

impl Default for TokenProvider {
    fn default() -> Self {
        Self::from_env()
    }
}

// Tokens must not end up in logs.
impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Static(***)"),
            Self::None => f.write_str("None"),
        }
    }
}
