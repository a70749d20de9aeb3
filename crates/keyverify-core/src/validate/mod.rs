//! The two verification steps: key validation and organization membership.

pub mod key;
pub mod membership;

pub use key::{check_identities, provenance_check, KeyValidator, KEY_STEP};
pub use membership::{
    membership_check, verify_github_user, MembershipOracle, MEMBERSHIP_REMARK, MEMBERSHIP_STEP,
};
