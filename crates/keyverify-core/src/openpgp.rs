//! OpenPGP implementation of the key inspection capability (Sequoia).

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use sequoia_openpgp as openpgp;
use openpgp::cert::prelude::*;
use openpgp::parse::Parse;
use openpgp::policy::StandardPolicy;
use openpgp::types::RevocationStatus;
use openpgp::Cert;
use tracing::debug;

use crate::error::KeyError;
use crate::key::{Identity, KeyParser, SigningKey};

const POLICY: &StandardPolicy<'static> = &StandardPolicy::new();

/// Parses ASCII-armored or binary transferable public keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenPgpParser;

impl KeyParser for OpenPgpParser {
    type Key = PgpKey;

    fn parse(&self, bytes: &[u8], at: DateTime<Utc>) -> Result<PgpKey, KeyError> {
        let cert = Cert::from_bytes(bytes).map_err(|e| KeyError::Malformed {
            message: format!("{:#}", e),
        })?;

        if cert.is_tsk() {
            return Err(KeyError::SecretKeyMaterial);
        }

        let at = SystemTime::from(at);
        if let Err(e) = cert.with_policy(POLICY, at) {
            return Err(KeyError::Policy {
                message: format!("{:#}", e),
            });
        }

        debug!(
            fingerprint = %cert.fingerprint(),
            userids = cert.userids().count(),
            subkeys = cert.keys().subkeys().count(),
            "parsed OpenPGP certificate"
        );

        Ok(PgpKey { cert, at })
    }
}

/// A parsed OpenPGP certificate, evaluated at a fixed reference time.
#[derive(Debug, Clone)]
pub struct PgpKey {
    cert: Cert,
    at: SystemTime,
}

impl PgpKey {
    pub fn cert(&self) -> &Cert {
        &self.cert
    }

    fn valid(&self) -> Option<ValidCert<'_>> {
        self.cert.with_policy(POLICY, self.at).ok()
    }
}

impl SigningKey for PgpKey {
    fn fingerprint(&self) -> String {
        self.cert.fingerprint().to_hex()
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.valid()
            .and_then(|vc| vc.primary_key().key_expiration_time())
            .map(DateTime::<Utc>::from)
    }

    fn is_revoked(&self) -> bool {
        matches!(
            self.cert.revocation_status(POLICY, self.at),
            RevocationStatus::Revoked(_)
        )
    }

    fn can_sign(&self) -> bool {
        self.valid().is_some_and(|vc| {
            vc.keys()
                .for_signing()
                .alive()
                .revoked(false)
                .next()
                .is_some()
        })
    }

    fn identities(&self) -> Vec<Identity> {
        let mut identities: Vec<Identity> = match self.valid() {
            Some(vc) => vc
                .userids()
                .revoked(false)
                .map(|ua| Identity::new(String::from_utf8_lossy(ua.userid().value())))
                .collect(),
            None => Vec::new(),
        };
        identities.sort();
        identities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpgp::serialize::SerializeInto;
    use std::time::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn armored(cert: &Cert) -> Vec<u8> {
        cert.armored().to_vec().unwrap()
    }

    #[test]
    fn test_parse_armored_and_binary() {
        let (cert, _) = CertBuilder::new()
            .add_userid("Alice <alice@example.com>")
            .add_signing_subkey()
            .generate()
            .unwrap();

        let from_armor = OpenPgpParser.parse(&armored(&cert), now()).unwrap();
        let from_binary = OpenPgpParser.parse(&cert.to_vec().unwrap(), now()).unwrap();

        assert_eq!(from_armor.fingerprint(), cert.fingerprint().to_hex());
        assert_eq!(from_binary.fingerprint(), from_armor.fingerprint());
        assert!(from_armor.can_sign());
        assert!(!from_armor.is_revoked());
        assert!(from_armor.expires_at().is_none() || !from_armor.is_expired(now()));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = OpenPgpParser.parse(b"not a key", now()).unwrap_err();
        assert!(matches!(err, KeyError::Malformed { .. }));
    }

    #[test]
    fn test_parse_rejects_secret_keys() {
        let (cert, _) = CertBuilder::new()
            .add_userid("Alice <alice@example.com>")
            .add_signing_subkey()
            .generate()
            .unwrap();
        let tsk = cert.as_tsk().armored().to_vec().unwrap();

        let err = OpenPgpParser.parse(&tsk, now()).unwrap_err();
        assert!(matches!(err, KeyError::SecretKeyMaterial));
    }

    #[test]
    fn test_expiration_is_reported() {
        let created = SystemTime::now() - Duration::from_secs(2 * 86_400);
        let (cert, _) = CertBuilder::new()
            .set_creation_time(created)
            .set_validity_period(Duration::from_secs(86_400))
            .add_userid("Old <old@example.com>")
            .add_signing_subkey()
            .generate()
            .unwrap();

        let key = OpenPgpParser.parse(&armored(&cert), now()).unwrap();
        let expiry = key.expires_at().expect("key has an expiration time");
        assert!(expiry < now());
        assert!(key.is_expired(now()));
    }

    #[test]
    fn test_revocation_is_reported() {
        let (cert, rev) = CertBuilder::new()
            .add_userid("Gone <gone@example.com>")
            .add_signing_subkey()
            .generate()
            .unwrap();
        let cert = cert.insert_packets(vec![rev]).unwrap();

        let key = OpenPgpParser.parse(&armored(&cert), now()).unwrap();
        assert!(key.is_revoked());
    }

    #[test]
    fn test_encryption_only_cannot_sign() {
        let (cert, _) = CertBuilder::new()
            .add_userid("Enc <enc@example.com>")
            .add_transport_encryption_subkey()
            .generate()
            .unwrap();

        let key = OpenPgpParser.parse(&armored(&cert), now()).unwrap();
        assert!(!key.can_sign());
    }

    #[test]
    fn test_identities_are_sorted() {
        let (cert, _) = CertBuilder::new()
            .add_userid("Zed <zed@example.com>")
            .add_userid("Alice <alice@example.com>")
            .add_userid("Mallory")
            .add_signing_subkey()
            .generate()
            .unwrap();

        let key = OpenPgpParser.parse(&armored(&cert), now()).unwrap();
        let raw: Vec<_> = key.identities().into_iter().map(|i| i.raw).collect();
        assert_eq!(
            raw,
            ["Alice <alice@example.com>", "Mallory", "Zed <zed@example.com>"]
        );
    }

    #[test]
    fn test_key_without_userids_has_no_identities() {
        let (cert, _) = CertBuilder::new().add_signing_subkey().generate().unwrap();
        let key = OpenPgpParser.parse(&armored(&cert), now()).unwrap();
        assert!(key.identities().is_empty());
    }
}
