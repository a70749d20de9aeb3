//! Error types for key loading and validation.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Failures to obtain a usable key object from raw input.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The key file could not be read.
    #[error("failed to read key file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not an OpenPGP certificate.
    #[error("could not parse key: {message}")]
    Malformed { message: String },

    /// Secret key material was supplied where a public key was expected.
    #[error("key contains secret key material, only public keys are accepted")]
    SecretKeyMaterial,

    /// The certificate is not valid under the signature policy.
    #[error("key is not valid under the OpenPGP policy: {message}")]
    Policy { message: String },
}

/// A validation check on a parsed key did not hold.
#[derive(Debug, thiserror::Error)]
pub enum KeyCheckError {
    #[error("key is expired (expired at {expired_at})")]
    Expired { expired_at: DateTime<Utc> },

    #[error("key is revoked")]
    Revoked,

    #[error("key cannot be used for signing")]
    CannotSign,

    #[error("key has no fingerprint")]
    NoFingerprint,

    #[error("key has no identities")]
    NoIdentities,

    #[error("key identity {identity:?} has no name")]
    MissingName { identity: String },

    #[error("key identity {identity:?} has no email")]
    MissingEmail { identity: String },

    #[error("key identity {identity:?} has an invalid email")]
    InvalidEmail {
        identity: String,
        #[source]
        source: EmailError,
    },

    #[error("signing provenance is not verified yet")]
    ProvenanceUnverified,
}

impl KeyCheckError {
    /// Whether a failure of this kind is reported as a warning only.
    pub fn is_downgradable(&self) -> bool {
        matches!(
            self,
            Self::MissingEmail { .. } | Self::InvalidEmail { .. } | Self::ProvenanceUnverified
        )
    }
}

/// Why an address does not match the addr-spec grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("no address")]
    Empty,

    #[error("missing @ in addr-spec")]
    MissingAt,

    #[error("unterminated quoted-string")]
    UnterminatedQuote,

    #[error("invalid local part {local:?}")]
    InvalidLocalPart { local: String },

    #[error("invalid domain {domain:?}")]
    InvalidDomain { domain: String },
}

/// Organization membership could not be confirmed.
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    /// The lookup succeeded and reported non-membership.
    #[error("user is not a member of the organization")]
    NotMember,

    /// The lookup itself failed.
    #[error("failed to get user")]
    Lookup {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The caller's deadline passed before the lookup completed.
    #[error("failed to get user: membership lookup did not finish before the deadline")]
    DeadlineExceeded,
}
