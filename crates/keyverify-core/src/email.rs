//! Email extraction from OpenPGP user IDs and addr-spec validation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::EmailError;

/// Characters allowed in an atom besides alphanumerics (RFC 5322 `atext`).
const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

lazy_static! {
    /// Greedy prefix, so the capture starts after the last `<`.
    static ref BRACKETED_EMAIL: Regex = Regex::new(r".*<(.*)>").unwrap();
}

/// Extract the text between the last `<` and the final `>` of a user ID.
///
/// `"Alice (work) <alice@example.com>"` yields `Some("alice@example.com")`;
/// a user ID without angle brackets yields `None`.
pub fn extract_bracketed(user_id: &str) -> Option<&str> {
    BRACKETED_EMAIL
        .captures(user_id)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Validate a bare address (`local@domain`).
///
/// Accepts dot-atom or quoted-string local parts and dot-atom or
/// domain-literal domains. Surrounding whitespace is ignored.
pub fn parse_address(input: &str) -> Result<String, EmailError> {
    let address = input.trim();
    if address.is_empty() {
        return Err(EmailError::Empty);
    }

    let (local, domain) = split_address(address)?;

    if !is_dot_atom(local) && !is_quoted_string(local) {
        return Err(EmailError::InvalidLocalPart {
            local: local.to_string(),
        });
    }
    if !is_dot_atom(domain) && !is_domain_literal(domain) {
        return Err(EmailError::InvalidDomain {
            domain: domain.to_string(),
        });
    }

    Ok(address.to_string())
}

/// Split on the `@` that separates local part and domain. A quoted local
/// part may itself contain `@`, so the split happens after the closing quote.
fn split_address(address: &str) -> Result<(&str, &str), EmailError> {
    let at = if address.starts_with('"') {
        let close = closing_quote(address).ok_or(EmailError::UnterminatedQuote)?;
        match address[close + 1..].find('@') {
            Some(0) => close + 1,
            _ => return Err(EmailError::MissingAt),
        }
    } else {
        address.rfind('@').ok_or(EmailError::MissingAt)?
    };

    let (local, domain) = (&address[..at], &address[at + 1..]);
    if local.is_empty() {
        return Err(EmailError::InvalidLocalPart {
            local: String::new(),
        });
    }
    if domain.is_empty() {
        return Err(EmailError::InvalidDomain {
            domain: String::new(),
        });
    }
    Ok((local, domain))
}

/// Byte index of the quote closing a string that starts with `"`.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || ATEXT_SPECIALS.contains(c) || (!c.is_ascii() && !c.is_control())
}

fn is_dot_atom(s: &str) -> bool {
    !s.is_empty()
        && s
            .split('.')
            .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_quoted_string(s: &str) -> bool {
    if s.len() < 2 || !s.starts_with('"') || !s.ends_with('"') {
        return false;
    }
    if closing_quote(s) != Some(s.len() - 1) {
        return false;
    }

    let inner = &s[1..s.len() - 1];
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            c if c.is_control() && c != '\t' => return false,
            _ => {}
        }
    }
    !escaped
}

fn is_domain_literal(s: &str) -> bool {
    s.len() >= 2
        && s.starts_with('[')
        && s.ends_with(']')
        && s[1..s.len() - 1]
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, '[' | ']' | '\\'))
}
