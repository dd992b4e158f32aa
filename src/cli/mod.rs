//! Command-line interface.
//!
//! `chromedriver-sync` has a single default action and a few alternative
//! modes selected by flags:
//!
//! ```bash
//! # Update the driver, prompting for the install directory
//! chromedriver-sync
//!
//! # Non-interactive update into a fixed directory
//! chromedriver-sync --yes --target-dir C:\tools\selenium
//!
//! # Compare versions without installing
//! chromedriver-sync --check
//!
//! # List every channel in the catalog
//! chromedriver-sync --status --json
//!
//! # Put the previous driver back
//! chromedriver-sync --rollback
//! ```
//!
//! # Modules
//!
//! - `common` - settings, destination, and driver lookup shared by every mode
//! - `update` - the full update pipeline and the `--check` dry run
//! - `status` - catalog listing
//! - `rollback` - restoring the `.bak` copy

mod common;
mod rollback;
mod status;
mod update;

use crate::constants::CATALOG_URL;
use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Keep a local ChromeDriver in sync with the Chrome for Testing stable channel.
#[derive(Parser, Debug)]
#[command(
    name = "chromedriver-sync",
    version,
    about = "Keep a local ChromeDriver in sync with the Chrome for Testing stable channel",
    long_about = "Checks the Chrome for Testing dashboard for the latest stable ChromeDriver, \
                  compares it with the installed driver, and downloads and installs the new \
                  version when the local one is older or missing. The previous driver is kept \
                  as <name>.bak."
)]
#[command(group(ArgGroup::new("mode").args(["check", "status", "rollback"])))]
pub struct Cli {
    /// Compare the installed driver with the stable release without installing.
    #[arg(long)]
    pub check: bool,

    /// Show the version of every channel and whether a driver exists for the platform.
    #[arg(long)]
    pub status: bool,

    /// Restore the previously installed driver from its `.bak` copy.
    #[arg(long)]
    pub rollback: bool,

    /// Reinstall even when the installed driver is current.
    #[arg(long, conflicts_with = "mode")]
    pub force: bool,

    /// Use the remembered install directory without prompting.
    #[arg(short, long)]
    pub yes: bool,

    /// Install directory. Skips the prompt.
    #[arg(long, value_name = "DIR")]
    pub target_dir: Option<String>,

    /// Chrome for Testing platform id (win64, win32, linux64, mac-x64, mac-arm64).
    #[arg(long, value_name = "ID")]
    pub platform: Option<String>,

    /// Driver executable to query for the installed version.
    ///
    /// Defaults to the driver in the install directory, then to one on PATH.
    #[arg(long, value_name = "PATH")]
    pub driver: Option<PathBuf>,

    /// Catalog page to read versions and download links from.
    #[arg(long, value_name = "URL", default_value = CATALOG_URL)]
    pub catalog_url: String,

    /// Directory archives are extracted into.
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Settings file to use instead of the default location.
    #[arg(long, value_name = "FILE", env = "CHROMEDRIVER_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print `--status` output as JSON.
    #[arg(long, requires = "status")]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// `tracing` filter directive implied by `-v`/`-q`, or `None` to defer to
    /// `RUST_LOG`.
    #[must_use]
    pub fn log_directive(&self) -> Option<&'static str> {
        if self.verbose {
            Some("chromedriver_sync=debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }

    /// Run the selected mode.
    pub async fn execute(self) -> Result<()> {
        if self.status {
            status::execute(&self).await
        } else if self.rollback {
            rollback::execute(&self).await
        } else if self.check {
            update::check(&self).await
        } else {
            update::execute(&self).await
        }
    }
}
