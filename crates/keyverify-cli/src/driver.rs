//! One verification run: setup, the two steps, rendering, exit code.

use std::time::Duration;

use anyhow::{bail, Context};
use keyverify_core::{verify_github_user, KeyValidator, MembershipOracle, Report};
use keyverify_github::{GithubClient, GithubConfig};
use tokio::time::Instant;
use tracing::{info, info_span};

use crate::cli::Cli;
use crate::exit_codes;
use crate::output;

/// Run the full verification described by `args` and return the exit code.
///
/// `Err` is reserved for setup problems; verification failures are an
/// ordinary result.
pub async fn run(args: Cli) -> anyhow::Result<i32> {
    let client = github_client(&args)?;

    let report = verify(&args, &client).await;
    let rendered = report.render(args.format.into());

    output::print_report(&rendered)?;
    if let Some(path) = &args.output {
        output::write_atomic(path, &rendered)
            .await
            .with_context(|| format!("failed to persist report to {}", path.display()))?;
        info!(location = %path.display(), "report written");
    }

    Ok(exit_code(&report))
}

/// Build both steps against `oracle`, key step first.
pub async fn verify<O>(args: &Cli, oracle: &O) -> Report
where
    O: MembershipOracle + ?Sized,
{
    let span = info_span!("verify_gpg_key", github = %args.username, org = %args.org);
    let deadline = Instant::now() + Duration::from_secs(args.timeout);

    let mut report = Report::new();
    report.append(
        KeyValidator::new(&args.org)
            .verify_file(&args.key_file, &span)
            .await,
    );
    report.append(verify_github_user(oracle, &args.username, &args.org, deadline, &span).await);

    info!(
        parent: &span,
        status = %report.status(),
        failed = report.did_fail(),
        "verification finished"
    );
    report
}

pub fn exit_code(report: &Report) -> i32 {
    if report.did_fail() {
        exit_codes::VERIFICATION_FAILED
    } else {
        exit_codes::SUCCESS
    }
}

fn github_client(args: &Cli) -> anyhow::Result<GithubClient> {
    let config = GithubConfig::from_env()
        .with_url(&args.github_api_url)
        .with_timeout_secs(args.timeout);
    if config.token.is_none() {
        bail!("no GitHub token found: set GITHUB_TOKEN or GH_TOKEN");
    }

    GithubClient::new(config).context("failed to set up GitHub client")
}
