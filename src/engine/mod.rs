//! The update state machine.
//!
//! [`UpdateEngine`] ties the other components together: it parses the raw
//! catalog, compares the stable version with the local one, and drives the
//! [`ArtifactInstaller`] when the local driver is outdated or missing.
//!
//! ```text
//! Idle ─► CatalogFetched ─► VersionCompared ─┬─► UpToDate
//!   │            │                 │         └─► Downloading ─► Extracted ─► Installed
//!   └────────────┴─────────────────┴──────────────────┴─────────────┴──► Failed
//! ```
//!
//! Every transition is logged and kept in [`UpdateEngine::transitions`]. The
//! pipeline is strictly sequential and never retries.

use crate::catalog::{self, ChannelInfo, ParseError};
use crate::constants::DRIVER_ARTIFACT_KIND;
use crate::installer::{ArtifactInstaller, InstallError, InstallResult};
use crate::version::{Classification, VersionComparisonResult, compare};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// States of one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    Idle,
    CatalogFetched,
    VersionCompared,
    UpToDate,
    Downloading,
    Extracted,
    Installed,
    Failed,
}

impl EngineState {
    /// `true` for states a run ends in.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::UpToDate | Self::Installed | Self::Failed)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CatalogFetched => "catalog-fetched",
            Self::VersionCompared => "version-compared",
            Self::UpToDate => "up-to-date",
            Self::Downloading => "downloading",
            Self::Extracted => "extracted",
            Self::Installed => "installed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why a run ended in [`EngineState::Failed`].
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The catalog could not be parsed or has no stable channel.
    #[error("Catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// The stable channel lists no download for the requested kind and platform.
    #[error("No {kind} download for platform '{platform}' in the stable channel")]
    NoDownloadForPlatform { kind: String, platform: String },

    #[error(transparent)]
    Install(#[from] InstallError),
}

impl From<ParseError> for UpdateError {
    fn from(e: ParseError) -> Self {
        Self::CatalogUnavailable {
            reason: e.to_string(),
        }
    }
}

/// A failed run, with whatever versions were known when it failed.
#[derive(Error, Debug)]
#[error("ChromeDriver update failed")]
pub struct UpdateFailure {
    pub local_version: Option<String>,
    pub target_version: Option<String>,
    #[source]
    pub error: UpdateError,
}

/// Input of one run.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Catalog page body as fetched.
    pub raw_catalog: String,
    /// Installed driver version; `None` when no driver is installed.
    pub local_version: Option<String>,
    /// Where archives are extracted.
    pub staging_dir: PathBuf,
    /// Where the binary is installed.
    pub destination_dir: PathBuf,
}

/// Behaviour switches for the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Catalog artifact kind to install.
    pub artifact_kind: String,
    /// Install even when the local driver is current.
    pub force: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            artifact_kind: DRIVER_ARTIFACT_KIND.to_string(),
            force: false,
        }
    }
}

/// What the engine concluded after comparing versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDecision {
    pub local_version: Option<String>,
    pub target_version: String,
    /// `None` when there was no local version to compare.
    pub comparison: Option<VersionComparisonResult>,
    /// `true` when the local driver is missing or older than stable.
    pub needs_update: bool,
    /// Driver URL for the configured platform, if the catalog lists one.
    pub download_url: Option<String>,
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    UpToDate,
    Installed(InstallResult),
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub decision: UpdateDecision,
    pub outcome: UpdateOutcome,
}

impl UpdateReport {
    pub fn installed(&self) -> Option<&InstallResult> {
        match &self.outcome {
            UpdateOutcome::Installed(result) => Some(result),
            UpdateOutcome::UpToDate => None,
        }
    }
}

/// Drives one catalog-to-install run.
pub struct UpdateEngine {
    installer: ArtifactInstaller,
    options: EngineOptions,
    transitions: Vec<EngineState>,
}

impl UpdateEngine {
    pub fn new(installer: ArtifactInstaller, options: EngineOptions) -> Self {
        Self {
            installer,
            options,
            transitions: vec![EngineState::Idle],
        }
    }

    /// Current state.
    pub fn state(&self) -> EngineState {
        self.transitions.last().copied().unwrap_or(EngineState::Idle)
    }

    /// Every state visited during the last run, starting with `Idle`.
    pub fn transitions(&self) -> &[EngineState] {
        &self.transitions
    }

    pub fn platform(&self) -> &str {
        self.installer.layout().platform()
    }

    /// Run the engine up to `VersionCompared` without installing anything.
    ///
    /// # Errors
    ///
    /// Fails with [`UpdateError::CatalogUnavailable`] when the catalog cannot
    /// be parsed or has no stable channel.
    pub fn check(
        &mut self,
        raw_catalog: &str,
        local_version: Option<&str>,
    ) -> Result<UpdateDecision, UpdateFailure> {
        self.transitions = vec![EngineState::Idle];
        self.evaluate(raw_catalog, local_version).map(|(_, decision)| decision)
    }

    /// Run the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns an [`UpdateFailure`] carrying the known versions and the
    /// typed cause. The engine is left in [`EngineState::Failed`].
    pub async fn run(&mut self, request: &UpdateRequest) -> Result<UpdateReport, UpdateFailure> {
        self.transitions = vec![EngineState::Idle];

        let (stable, decision) =
            self.evaluate(&request.raw_catalog, request.local_version.as_deref())?;

        if !decision.needs_update && !self.options.force {
            self.transition(EngineState::UpToDate);
            return Ok(UpdateReport {
                decision,
                outcome: UpdateOutcome::UpToDate,
            });
        }
        if !decision.needs_update {
            info!("Forcing reinstall of {}", stable.version());
        }

        let Some(url) = decision.download_url.clone() else {
            let error = UpdateError::NoDownloadForPlatform {
                kind: self.options.artifact_kind.clone(),
                platform: self.platform().to_string(),
            };
            return Err(self.fail(&decision, error));
        };

        self.transition(EngineState::Downloading);
        let root = match self.installer.fetch_and_extract(&url, &request.staging_dir).await {
            Ok(root) => root,
            Err(e) => return Err(self.fail(&decision, e.into())),
        };

        self.transition(EngineState::Extracted);
        let installed = match self.installer.place_binary(&root, &request.destination_dir).await {
            Ok(installed) => installed,
            Err(e) => return Err(self.fail(&decision, e.into())),
        };

        self.transition(EngineState::Installed);
        Ok(UpdateReport {
            decision,
            outcome: UpdateOutcome::Installed(installed),
        })
    }

    fn evaluate(
        &mut self,
        raw_catalog: &str,
        local_version: Option<&str>,
    ) -> Result<(ChannelInfo, UpdateDecision), UpdateFailure> {
        let local_version = local_version.map(str::to_string);

        let stable = match catalog::parse(raw_catalog) {
            Ok(catalog) => catalog.stable().cloned().ok_or_else(|| UpdateError::CatalogUnavailable {
                reason: "catalog has no stable channel".to_string(),
            }),
            Err(e) => Err(UpdateError::from(e)),
        };
        let stable = match stable {
            Ok(stable) => stable,
            Err(error) => {
                self.transition(EngineState::Failed);
                warn!("Update failed: {}", error);
                return Err(UpdateFailure {
                    local_version,
                    target_version: None,
                    error,
                });
            }
        };
        self.transition(EngineState::CatalogFetched);

        let target = stable.version().to_string();
        let comparison = local_version.as_deref().map(|local| compare(local, &target));
        let needs_update = match &comparison {
            None => {
                debug!("No local driver, update needed");
                true
            }
            Some(result) => {
                if result.classification == Classification::Unparseable {
                    warn!("Cannot compare '{}' with '{}', leaving driver alone", result.local, target);
                }
                result.needs_update
            }
        };
        self.transition(EngineState::VersionCompared);

        let download_url = stable
            .download_url(&self.options.artifact_kind, self.platform())
            .map(str::to_string);

        let decision = UpdateDecision {
            local_version,
            target_version: target,
            comparison,
            needs_update,
            download_url,
        };
        Ok((stable, decision))
    }

    fn transition(&mut self, to: EngineState) {
        info!("Update engine: {} -> {}", self.state(), to);
        self.transitions.push(to);
    }

    fn fail(&mut self, decision: &UpdateDecision, error: UpdateError) -> UpdateFailure {
        self.transition(EngineState::Failed);
        warn!("Update failed: {}", error);
        UpdateFailure {
            local_version: decision.local_version.clone(),
            target_version: Some(decision.target_version.clone()),
            error,
        }
    }
}
