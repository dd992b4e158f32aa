//! Remembered user choices between runs.
//!
//! # Location
//!
//! - Unix/macOS: `~/.chromedriver-sync/settings.toml`
//! - Windows: `%LOCALAPPDATA%\chromedriver-sync\settings.toml`
//!
//! Overridden by `--config` or the `CHROMEDRIVER_SYNC_CONFIG` environment
//! variable.
//!
//! ```toml
//! target_directory = "C:\\tools\\selenium"
//! platform = "win64"
//! last_update = "2026-10-16T09:12:44Z"
//! ```

use crate::constants::{CONFIG_PATH_ENV, DEFAULT_PLATFORM};
use crate::utils::fs::atomic_write;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings carried from one run to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RememberedSettings {
    /// Directory the driver is installed into.
    pub target_directory: PathBuf,

    /// When the driver was last installed successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,

    /// Chrome for Testing platform id, e.g. `win64` or `linux64`.
    pub platform: String,
}

impl Default for RememberedSettings {
    fn default() -> Self {
        Self {
            target_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            last_update: None,
            platform: DEFAULT_PLATFORM.to_string(),
        }
    }
}

impl RememberedSettings {
    /// Record a successful install into `target_directory` now.
    pub fn record_update(&mut self, target_directory: &Path, platform: &str) {
        self.target_directory = target_directory.to_path_buf();
        self.platform = platform.to_string();
        self.last_update = Some(Utc::now());
    }
}

/// Persistence for [`RememberedSettings`].
pub trait SettingsStore {
    /// Load settings, falling back to defaults when none are stored or the
    /// stored data cannot be read.
    fn load(&self) -> RememberedSettings;

    /// Persist `settings`.
    fn save(&self, settings: &RememberedSettings) -> Result<()>;
}

/// [`SettingsStore`] backed by a TOML file.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Store at `path` if given, else `$CHROMEDRIVER_SYNC_CONFIG`, else the
    /// platform default.
    ///
    /// # Errors
    ///
    /// Fails when no explicit path is given and the home directory cannot be
    /// determined.
    pub fn locate(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Ok(Self::new(path));
        }
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(Self::new(PathBuf::from(path)));
        }
        Ok(Self::new(Self::default_path()?))
    }

    /// Platform default location of the settings file.
    ///
    /// # Errors
    ///
    /// Fails if the home (or on Windows, local data) directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("chromedriver-sync")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".chromedriver-sync")
        };

        Ok(config_dir.join("settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RememberedSettings> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", self.path.display()))
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> RememberedSettings {
        if !self.path.exists() {
            debug!("No settings at {}, using defaults", self.path.display());
            return RememberedSettings::default();
        }

        match self.read() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring unreadable settings: {:#}", e);
                RememberedSettings::default()
            }
        }
    }

    fn save(&self, settings: &RememberedSettings) -> Result<()> {
        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        atomic_write(&self.path, content.as_bytes())
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
