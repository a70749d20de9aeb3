//! Report sink: stdout and an optional file.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::fs;

/// Print the report to stdout, always ending with a newline.
pub fn print_report(rendered: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush().context("failed to write report to stdout")
}

/// Write `content` to `path` via a sibling temp file and a rename, so readers
/// never see a partial report.
pub async fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    let temp_path = temp_path_for(path);

    fs::write(&temp_path, content)
        .await
        .with_context(|| format!("failed to write temp file {}", temp_path.display()))?;

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e).with_context(|| format!("failed to move report into {}", path.display()));
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
