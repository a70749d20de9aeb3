//! Verification pipeline for registry publisher signing keys.
//!
//! A verification run is a sequence of [`Step`]s, each made of [`Substep`]s
//! that record a [`Status`] plus remarks and errors. The steps are collected
//! into a [`Report`] which renders as Markdown or JSON.
//!
//! Two steps are provided:
//!
//! - [`KeyValidator`]: parses an OpenPGP public key and checks expiry,
//!   revocation, signing capability and identities
//! - [`verify_github_user`]: confirms public organization membership through
//!   a [`MembershipOracle`]
//!
//! ```no_run
//! use keyverify_core::{KeyValidator, Report, ReportFormat};
//!
//! # async fn example() {
//! let span = tracing::info_span!("verify", github = "octocat", org = "acme");
//! let mut report = Report::new();
//! report.append(KeyValidator::new("acme").verify_file("key.asc", &span).await);
//! println!("{}", report.render(ReportFormat::Markdown));
//! # }
//! ```

pub mod email;
pub mod error;
pub mod key;
pub mod openpgp;
pub mod report;
pub mod status;
pub mod step;
pub mod validate;

pub use error::{EmailError, KeyCheckError, KeyError, MembershipError};
pub use key::{Identity, KeyParser, SigningKey};
pub use openpgp::{OpenPgpParser, PgpKey};
pub use report::{Report, ReportFormat};
pub use status::Status;
pub use step::{Step, Substep};
pub use validate::{
    verify_github_user, KeyValidator, MembershipOracle, KEY_STEP, MEMBERSHIP_REMARK,
    MEMBERSHIP_STEP,
};
