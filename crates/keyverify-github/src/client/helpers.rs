//! Pure helpers: URL building, error body parsing (no HTTP, no status logic).

use crate::error::{GithubError, GithubResult};

/// URL of the public membership resource for `username` in `org`.
pub(crate) fn public_member_url(
    base_url: &str,
    org: &str,
    username: &str,
) -> GithubResult<String> {
    Ok(format!(
        "{}/orgs/{}/public_members/{}",
        base_url,
        path_segment(org)?,
        path_segment(username)?
    ))
}

/// Encode one path segment.
///
/// Bytes outside the unreserved set are percent-encoded. Empty, `.` and `..`
/// are rejected: URL parsing resolves dot segments even when encoded, and an
/// empty segment collapses into its neighbour.
fn path_segment(raw: &str) -> GithubResult<String> {
    if matches!(raw, "" | "." | "..") {
        return Err(GithubError::Config {
            message: format!("invalid path segment {:?}", raw),
        });
    }

    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    Ok(out)
}

/// Extract the human-readable message from a GitHub error body.
///
/// Expected format: `{"message": "...", "documentation_url": "..."}`.
/// Falls back to a truncated raw body when it is not JSON.
pub(crate) fn error_message(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        return json
            .get("message")
            .and_then(|v| v.as_str())
            .map(|s| s.to_lowercase());
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(200).collect())
    }
}
