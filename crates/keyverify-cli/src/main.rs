use clap::Parser;

mod cli;
mod driver;
pub mod exit_codes;
mod logging;
mod output;

use cli::Cli;

// Checks run strictly one after another; a single thread is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    let code = match driver::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:#}");
            exit_codes::SETUP_ERROR
        }
    };
    std::process::exit(code);
}
