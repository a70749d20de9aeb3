//! Organization membership check.

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{info, Instrument, Span};

use crate::error::MembershipError;
use crate::status::Status;
use crate::step::Step;

pub const MEMBERSHIP_STEP: &str = "Validate Github user";

/// Attached to a failed membership check. Private membership is the usual cause.
pub const MEMBERSHIP_REMARK: &str = "If this is incorrect, please ensure that your organization membership is public. For more information, see [Github Docs - Publicizing or hiding organization membership](https://docs.github.com/en/account-and-profile/setting-up-and-managing-your-personal-account-on-github/managing-your-membership-in-organizations/publicizing-or-hiding-organization-membership)";

/// Description of the membership substep for `org`.
pub fn membership_check(org: &str) -> String {
    format!("User is a member of the organization {}", org)
}

/// Answers whether a user is a publicly visible member of an organization.
#[async_trait]
pub trait MembershipOracle: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `Ok(false)` means the lookup worked and the user is not a public member.
    async fn is_member(&self, username: &str, org: &str) -> Result<bool, Self::Error>;
}

/// Build the [`MEMBERSHIP_STEP`] step with its single membership substep.
///
/// The lookup is abandoned once `deadline` passes.
pub async fn verify_github_user<O>(
    oracle: &O,
    username: &str,
    org: &str,
    deadline: Instant,
    span: &Span,
) -> Step
where
    O: MembershipOracle + ?Sized,
{
    let mut step = Step::new(MEMBERSHIP_STEP);

    let lookup = async {
        match tokio::time::timeout_at(deadline, oracle.is_member(username, org)).await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(MembershipError::NotMember),
            Ok(Err(e)) => Err(MembershipError::Lookup {
                source: Box::new(e),
            }),
            Err(_) => Err(MembershipError::DeadlineExceeded),
        }
    };

    let substep = step
        .run_async(membership_check(org), lookup.instrument(span.clone()))
        .await;
    if substep.status() == Status::Failure {
        substep.add_remark(MEMBERSHIP_REMARK);
    }

    info!(parent: span, status = %step.status(), "membership validation finished");
    step
}
