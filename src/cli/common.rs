//! Pieces shared by every CLI mode.

use super::Cli;
use crate::catalog::CatalogClient;
use crate::config::{RememberedSettings, SettingsStore, TomlSettingsStore};
use crate::installer::DriverLayout;
use crate::probe::probe_local_version;
use crate::utils::platform::{find_executable, resolve_path};
use crate::utils::progress::ProgressBar;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings store and its loaded contents.
pub(super) struct Session {
    pub store: TomlSettingsStore,
    pub settings: RememberedSettings,
}

impl Session {
    pub fn load(cli: &Cli) -> Result<Self> {
        let store = TomlSettingsStore::locate(cli.config.clone())?;
        let settings = store.load();
        debug!("Loaded settings from {}: {:?}", store.path().display(), settings);
        Ok(Self {
            store,
            settings,
        })
    }

    /// `--platform`, else the remembered platform.
    pub fn platform(&self, cli: &Cli) -> String {
        cli.platform.clone().unwrap_or_else(|| self.settings.platform.clone())
    }

    /// `--target-dir`, else the remembered directory.
    pub fn target_dir(&self, cli: &Cli) -> Result<PathBuf> {
        match &cli.target_dir {
            Some(dir) => resolve_path(dir),
            None => Ok(self.settings.target_directory.clone()),
        }
    }
}

/// Ask for the install directory on stdin, offering `default`.
///
/// An empty answer accepts the default.
pub(super) fn prompt_destination(default: &Path) -> Result<PathBuf> {
    print!(
        "{} [{}]: ",
        "Install ChromeDriver into".bold(),
        default.display().to_string().cyan()
    );
    std::io::stdout().flush().context("Failed to write prompt")?;

    let stdin = std::io::stdin();
    read_destination(&mut stdin.lock(), default)
}

pub(super) fn read_destination(input: &mut impl BufRead, default: &Path) -> Result<PathBuf> {
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read install directory")?;

    if line.trim().is_empty() { Ok(default.to_path_buf()) } else { resolve_path(&line) }
}

/// Path of the driver whose version decides whether to update.
///
/// `--driver` wins; otherwise the driver already in `target_dir`, then the
/// first one on `PATH`.
pub(super) fn driver_to_probe(cli: &Cli, layout: &DriverLayout, target_dir: &Path) -> Option<PathBuf> {
    if let Some(driver) = &cli.driver {
        return Some(driver.clone());
    }

    let installed = layout.installed_path(target_dir);
    if installed.is_file() {
        return Some(installed);
    }

    find_executable(layout.executable_name())
}

pub(super) async fn local_version(cli: &Cli, layout: &DriverLayout, target_dir: &Path) -> Option<String> {
    let driver = driver_to_probe(cli, layout, target_dir)?;
    probe_local_version(&driver).await
}

pub(super) async fn fetch_catalog(cli: &Cli) -> Result<String> {
    let client = CatalogClient::with_url(&cli.catalog_url)?;

    let spinner = if cli.no_progress { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
    spinner.set_prefix("Catalog");
    spinner.set_message(format!("Fetching {}", client.url()));
    let page = client.fetch_page().await;
    spinner.finish_and_clear();

    page.context("Failed to fetch the Chrome for Testing catalog")
}
