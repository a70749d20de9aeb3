//! Key validation: a fixed pipeline of substeps over one signing key.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info, warn, Span};

use crate::email::{extract_bracketed, parse_address};
use crate::error::{KeyCheckError, KeyError};
use crate::key::{Identity, KeyParser, SigningKey};
use crate::openpgp::OpenPgpParser;
use crate::step::Step;

pub const KEY_STEP: &str = "Validate GPG key";
pub const PARSE_CHECK: &str = "Key is a valid PGP key";
pub const NOT_EXPIRED_CHECK: &str = "Key is not expired";
pub const NOT_REVOKED_CHECK: &str = "Key is not revoked";
pub const CAN_SIGN_CHECK: &str = "Key can be used for signing";
pub const IDENTITY_CHECK: &str =
    "Key has a valid identity and email. (Email is preferable but optional)";

/// Description of the signing-provenance substep for `org`.
pub fn provenance_check(org: &str) -> String {
    format!("Key is used to sign providers published by {}", org)
}

/// Runs the key checks, in order, as substeps of one [`KEY_STEP`] step.
///
/// Only a parse failure stops the pipeline; every other check runs even if
/// an earlier one failed.
#[derive(Debug, Clone)]
pub struct KeyValidator<P = OpenPgpParser> {
    parser: P,
    org: String,
    now: DateTime<Utc>,
}

impl KeyValidator<OpenPgpParser> {
    /// Validator for OpenPGP keys, evaluated at the current time.
    pub fn new(org: impl Into<String>) -> Self {
        Self::with_parser(OpenPgpParser, org)
    }
}

impl<P: KeyParser> KeyValidator<P> {
    pub fn with_parser(parser: P, org: impl Into<String>) -> Self {
        Self {
            parser,
            org: org.into(),
            now: Utc::now(),
        }
    }

    /// Evaluate time-dependent checks at `now` instead of the creation time.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Load the key at `path` and validate it.
    ///
    /// An unreadable file fails the whole step without running any substep.
    pub async fn verify_file(&self, path: impl AsRef<Path>, span: &Span) -> Step {
        let path = path.as_ref();
        debug!(parent: span, location = %path.display(), "verifying GPG key from location");

        match tokio::fs::read(path).await {
            Ok(data) => self.verify_bytes(&data, span),
            Err(source) => {
                warn!(
                    parent: span,
                    location = %path.display(),
                    error = %source,
                    "failed to read key file"
                );
                let mut step = Step::new(KEY_STEP);
                step.add_error(KeyError::Read {
                    path: path.to_path_buf(),
                    source,
                });
                step.mark_failed();
                step
            }
        }
    }

    /// Validate already-loaded key material.
    pub fn verify_bytes(&self, bytes: &[u8], span: &Span) -> Step {
        let _entered = span.enter();
        let mut step = Step::new(KEY_STEP);

        let mut parsed = None;
        let substep = step.run(PARSE_CHECK, || {
            parsed = Some(self.parser.parse(bytes, self.now)?);
            Ok::<_, KeyError>(())
        });

        let Some(key) = parsed else {
            // Nothing else can be examined on a key that does not parse.
            step.mark_failed();
            info!(status = %step.status(), "key validation aborted");
            return step;
        };
        substep.add_remark(format!("Fingerprint: {}", key.fingerprint()));

        let substep = step.run(NOT_EXPIRED_CHECK, || {
            if key.is_expired(self.now) {
                return Err(KeyCheckError::Expired {
                    expired_at: key.expires_at().unwrap_or(self.now),
                });
            }
            Ok(())
        });
        if let Some(expiry) = key.expires_at() {
            substep.add_remark(format!(
                "Expires at {}",
                expiry.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
        }

        step.run(NOT_REVOKED_CHECK, || {
            if key.is_revoked() {
                return Err(KeyCheckError::Revoked);
            }
            Ok(())
        });

        step.run(CAN_SIGN_CHECK, || {
            if !key.can_sign() {
                return Err(KeyCheckError::CannotSign);
            }
            Ok(())
        });

        let outcome = check_identities(&key);
        let downgradable = outcome
            .as_ref()
            .err()
            .is_some_and(KeyCheckError::is_downgradable);
        let substep = step.run(IDENTITY_CHECK, || outcome);
        if downgradable {
            substep.downgrade();
        }

        // Extension point: provenance of provider signatures is not checked
        // yet, so this never passes and never fails the run.
        step.run(provenance_check(&self.org), || {
            Err::<(), _>(KeyCheckError::ProvenanceUnverified)
        })
        .downgrade();

        info!(status = %step.status(), "key validation finished");
        step
    }
}

/// The identity rule: a fingerprint, at least one identity, every identity
/// named, and every identity carrying a well-formed bracketed email.
///
/// Missing names are reported before any email problem, whatever the order of
/// the identities, so that a downgradable error is only returned when no
/// identity has a hard problem.
pub fn check_identities<K: SigningKey + ?Sized>(key: &K) -> Result<(), KeyCheckError> {
    if key.fingerprint().is_empty() {
        return Err(KeyCheckError::NoFingerprint);
    }

    let mut identities = key.identities();
    if identities.is_empty() {
        return Err(KeyCheckError::NoIdentities);
    }
    identities.sort();

    let mut email_problem = None;
    for identity in &identities {
        if identity.name.is_empty() {
            return Err(KeyCheckError::MissingName {
                identity: identity.raw.clone(),
            });
        }
        if email_problem.is_none() {
            email_problem = check_email(identity).err();
        }
    }

    match email_problem {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn check_email(identity: &Identity) -> Result<(), KeyCheckError> {
    let Some(candidate) = extract_bracketed(&identity.name) else {
        return Err(KeyCheckError::MissingEmail {
            identity: identity.raw.clone(),
        });
    };

    parse_address(candidate)
        .map(|_| ())
        .map_err(|source| KeyCheckError::InvalidEmail {
            identity: identity.raw.clone(),
            source,
        })
}
