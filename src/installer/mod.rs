//! Download, unpack, and place a driver binary.
//!
//! Installation has two halves that the update engine drives separately so
//! it can report progress between them:
//!
//! 1. [`ArtifactInstaller::fetch_and_extract`] streams a release archive to a
//!    temporary file and unpacks it into a staging directory.
//! 2. [`ArtifactInstaller::place_binary`] moves any installed binary aside to
//!    `<name>.bak`, then copies the new one into the destination.
//!
//! # Safety Guarantees
//!
//! - Nothing is written to the staging directory for a non-success HTTP
//!   response.
//! - Extraction is all-or-nothing: a corrupt archive never leaves a partial
//!   tree in the staging directory.
//! - The new binary is written to a temporary file in the destination and
//!   renamed into place, so the destination never holds a half-copied file.
//! - When placement fails after the backup was taken, the backup is renamed
//!   back so the previously working binary is not lost.

pub mod backup;
mod download;
mod extract;
pub mod layout;

pub use backup::BackupManager;
pub use layout::DriverLayout;

use crate::constants::ARCHIVE_TIMEOUT;
use crate::utils::http::build_client;
use anyhow::Context;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failures while fetching, unpacking, or placing a driver.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The archive could not be retrieved (network, DNS, timeout).
    #[error("Failed to download {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Download of {url} failed with HTTP status {status}")]
    HttpError { url: String, status: u16 },

    /// The payload is not a valid archive or an entry could not be written.
    #[error("Failed to extract archive: {reason}")]
    ExtractFailed { reason: String },

    /// The extracted tree does not contain the binary where it is expected.
    #[error("Driver binary not found in extracted archive at {}", path.display())]
    SourceMissing { path: PathBuf },

    /// The install target exists but is not a regular file.
    #[error("Refusing to replace {}: not a regular file", path.display())]
    TargetNotFile { path: PathBuf },

    /// There is no backup to roll back to.
    #[error("No backup found at {}", path.display())]
    BackupMissing { path: PathBuf },

    /// A file system operation on the destination failed.
    #[error("Failed to {operation} at {}: {source}", path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(operation: &str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.to_string(),
            path: path.into(),
            source,
        }
    }
}

/// One complete installation: archive URL, staging, and destination.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub source_archive_url: String,
    pub staging_dir: PathBuf,
    pub destination_dir: PathBuf,
}

/// Where the binary ended up and where the previous one was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub installed_path: PathBuf,
    /// `None` when no binary was installed before.
    pub backup_path: Option<PathBuf>,
}

/// Fetches driver archives for one platform and installs the binary.
pub struct ArtifactInstaller {
    client: reqwest::Client,
    layout: DriverLayout,
    show_progress: bool,
}

impl ArtifactInstaller {
    /// Installer for `platform` (e.g. `win64`, `linux64`) with the default
    /// archive download timeout.
    pub fn new(platform: impl Into<String>) -> anyhow::Result<Self> {
        let client = build_client(ARCHIVE_TIMEOUT).context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, platform))
    }

    /// Installer using a preconfigured HTTP client.
    pub fn with_client(client: reqwest::Client, platform: impl Into<String>) -> Self {
        Self {
            client,
            layout: DriverLayout::new(platform),
            show_progress: true,
        }
    }

    /// Enable or disable the download progress bar.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn layout(&self) -> &DriverLayout {
        &self.layout
    }

    /// Download the archive at `source_archive_url` and unpack it into
    /// `staging_dir`, returning the extracted root.
    ///
    /// Entries already present in `staging_dir` with the same names are
    /// replaced.
    ///
    /// # Errors
    ///
    /// - [`InstallError::FetchFailed`] when the request cannot complete
    /// - [`InstallError::HttpError`] for a non-success status
    /// - [`InstallError::ExtractFailed`] when the payload is not a valid archive
    pub async fn fetch_and_extract(
        &self,
        source_archive_url: &str,
        staging_dir: &Path,
    ) -> Result<PathBuf, InstallError> {
        let archive =
            download::download_archive(&self.client, source_archive_url, self.show_progress)
                .await?;

        let staging = staging_dir.to_path_buf();
        let placed = tokio::task::spawn_blocking(move || {
            extract::extract_archive(archive, &staging)
        })
        .await
        .map_err(|e| InstallError::ExtractFailed {
            reason: format!("extraction task failed: {e}"),
        })??;

        info!("Extracted {} top-level entries into {}", placed.len(), staging_dir.display());
        Ok(staging_dir.to_path_buf())
    }

    /// Install the driver from `extracted_root` into `destination_dir`.
    ///
    /// An existing binary is renamed to `<name>.bak` first, replacing any
    /// older backup. If writing the new binary fails the backup is renamed
    /// back.
    ///
    /// # Errors
    ///
    /// - [`InstallError::SourceMissing`] when the archive did not contain the
    ///   binary for this platform; the destination is left untouched
    /// - [`InstallError::Io`] for file system failures
    pub async fn place_binary(
        &self,
        extracted_root: &Path,
        destination_dir: &Path,
    ) -> Result<InstallResult, InstallError> {
        self.place_with(extracted_root, destination_dir, copy_into_place).await
    }

    async fn place_with<F>(
        &self,
        extracted_root: &Path,
        destination_dir: &Path,
        copy: F,
    ) -> Result<InstallResult, InstallError>
    where
        F: FnOnce(&Path, &Path) -> Result<(), InstallError> + Send + 'static,
    {
        let source = self.layout.source_path(extracted_root);
        if !source.is_file() {
            return Err(InstallError::SourceMissing {
                path: source,
            });
        }

        tokio::fs::create_dir_all(destination_dir)
            .await
            .map_err(|e| InstallError::io("create destination directory", destination_dir, e))?;

        let target = self.layout.installed_path(destination_dir);
        let backup = BackupManager::new(target.clone());
        let backup_path = backup.rotate().await?;

        let copy_target = target.clone();
        let copied = tokio::task::spawn_blocking(move || copy(&source, &copy_target))
            .await
            .map_err(|e| InstallError::io("copy driver binary", &target, io::Error::other(e)))
            .and_then(|result| result);

        if let Err(e) = copied {
            if backup_path.is_some() {
                if let Err(restore_err) = backup.restore_backup().await {
                    warn!("Could not restore previous driver: {}", restore_err);
                }
            }
            return Err(e);
        }

        info!("Installed driver at {}", target.display());
        Ok(InstallResult {
            installed_path: target,
            backup_path,
        })
    }

    /// Run [`fetch_and_extract`](Self::fetch_and_extract) then
    /// [`place_binary`](Self::place_binary) for a single request.
    pub async fn install(&self, request: &InstallRequest) -> Result<InstallResult, InstallError> {
        let root = self.fetch_and_extract(&request.source_archive_url, &request.staging_dir).await?;
        self.place_binary(&root, &request.destination_dir).await
    }
}

/// Copy `source` to a temp file beside `target` and rename it over `target`.
fn copy_into_place(source: &Path, target: &Path) -> Result<(), InstallError> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));

    let mut reader =
        fs::File::open(source).map_err(|e| InstallError::io("open extracted binary", source, e))?;
    let source_meta =
        reader.metadata().map_err(|e| InstallError::io("read extracted binary", source, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".chromedriver-")
        .tempfile_in(dir)
        .map_err(|e| InstallError::io("create temporary file", dir, e))?;
    io::copy(&mut reader, temp.as_file_mut())
        .map_err(|e| InstallError::io("copy driver binary", target, e))?;

    let mut permissions = source_meta.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o755);
    }
    fs::set_permissions(temp.path(), permissions)
        .map_err(|e| InstallError::io("set permissions", temp.path(), e))?;

    if let Ok(modified) = source_meta.modified() {
        if let Err(e) = temp.as_file().set_modified(modified) {
            debug!("Could not preserve modification time: {}", e);
        }
    }

    temp.as_file().sync_all().map_err(|e| InstallError::io("sync driver binary", target, e))?;
    temp.persist(target).map_err(|e| InstallError::io("move driver into place", target, e.error))?;
    Ok(())
}
