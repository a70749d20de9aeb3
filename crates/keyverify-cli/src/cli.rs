use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use keyverify_core::ReportFormat;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "verify-gpg-key",
    version,
    about = "Verify a provider publisher's GPG signing key and GitHub organization membership"
)]
pub struct Cli {
    /// Public key to verify (ASCII-armored or binary)
    #[arg(long, value_name = "PATH")]
    pub key_file: PathBuf,

    /// GitHub username of the publisher
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub username: String,

    /// GitHub organization the key is published for
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub org: String,

    /// Also write the rendered report to this file
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Deadline for network lookups, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10, env = "KEYVERIFY_TIMEOUT")]
    pub timeout: u64,

    #[arg(
        long,
        value_name = "URL",
        default_value = "https://api.github.com",
        env = "GITHUB_API_URL"
    )]
    pub github_api_url: String,

    /// Debug-level logs on stderr
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}
