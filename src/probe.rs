//! Detection of the installed driver version.
//!
//! Runs `<driver> --version` and reads the second whitespace-separated token
//! of the first output line:
//!
//! ```text
//! ChromeDriver 130.0.6723.91 (53ac07617ef8b8a37d1f4bd5b6a8d1a1b0f5a1b2-refs/branch-heads/6723@{#1402})
//! ```
//!
//! Every failure (missing executable, non-zero exit, timeout, odd output)
//! means "no local version" and is reported as `None`.

use crate::constants::PROBE_TIMEOUT;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Extract the version from `--version` output.
pub fn parse_version_output(output: &str) -> Option<String> {
    let first_line = output.lines().next()?;
    let version = first_line.split_whitespace().nth(1)?;
    Some(version.to_string())
}

/// Run `driver --version` and parse its output.
pub async fn probe_local_version(driver: &Path) -> Option<String> {
    debug!("Probing driver version: {} --version", driver.display());

    let mut cmd = Command::new(driver);
    cmd.arg("--version").stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::null());
    cmd.kill_on_drop(true);

    let output = match timeout(PROBE_TIMEOUT, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            debug!("Driver not runnable at {}: {}", driver.display(), e);
            return None;
        }
        Err(_) => {
            warn!(
                "{} --version did not finish within {} seconds",
                driver.display(),
                PROBE_TIMEOUT.as_secs()
            );
            return None;
        }
    };

    if !output.status.success() {
        debug!("{} --version exited with {}", driver.display(), output.status);
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = parse_version_output(&stdout);
    match &version {
        Some(v) => debug!("Local driver version {}", v),
        None => debug!("Unrecognised --version output: {:?}", stdout.trim()),
    }
    version
}
