//! Key inspection capability used by the key validator.
//!
//! The validator only sees keys through [`SigningKey`]; [`KeyParser`] turns
//! raw bytes into one. The OpenPGP implementation lives in
//! [`crate::openpgp`].

use chrono::{DateTime, Utc};

use crate::error::KeyError;

/// A self-asserted identity (OpenPGP user ID) carried by a key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Identity {
    /// The user ID exactly as stored in the key.
    pub raw: String,
    /// Human-readable form of the user ID: `raw` without surrounding
    /// whitespace. Empty means the identity has no name.
    pub name: String,
}

impl Identity {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let name = raw.trim().to_string();
        Self { raw, name }
    }
}

/// Read-only view of a parsed signing key.
///
/// Time-dependent answers (revocation, signing capability) are evaluated at
/// the reference time the key was parsed for.
pub trait SigningKey {
    /// Uppercase hex fingerprint of the primary key.
    fn fingerprint(&self) -> String;

    /// When the key expires, if it has an expiration time at all.
    fn expires_at(&self) -> Option<DateTime<Utc>>;

    /// Whether the key is expired at `at`.
    fn is_expired(&self, at: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry <= at)
    }

    /// Whether the key carries an effective revocation.
    fn is_revoked(&self) -> bool;

    /// Whether the key, or one of its live subkeys, can make signatures.
    fn can_sign(&self) -> bool;

    /// Identities in a stable order: ascending by raw user ID.
    fn identities(&self) -> Vec<Identity>;
}

/// Turns raw key material into a [`SigningKey`].
pub trait KeyParser {
    type Key: SigningKey;

    /// Parse `bytes`, evaluating validity at `at`.
    fn parse(&self, bytes: &[u8], at: DateTime<Utc>) -> Result<Self::Key, KeyError>;
}
