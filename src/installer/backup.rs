use super::InstallError;
use crate::constants::BACKUP_SUFFIX;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Manages the single `.bak` copy of a previously installed driver.
///
/// `BackupManager` keeps exactly one backup depth: rotating a new backup
/// replaces whatever `.bak` was there before. The backup is made by renaming
/// the installed binary in place, so it happens before any new bytes are
/// written and a crash at any point leaves either the old binary or its
/// `.bak` on disk.
///
/// # Backup Strategy
///
/// The backup sits next to the original with a `.bak` suffix appended to the
/// full file name (`chromedriver.exe` → `chromedriver.exe.bak`). A rename
/// keeps the same file system, permissions, and timestamps.
///
/// # Examples
///
/// ```rust,no_run
/// use chromedriver_sync::installer::backup::BackupManager;
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let manager = BackupManager::new(PathBuf::from("/opt/drivers/chromedriver"));
///
/// if manager.backup_exists() {
///     manager.restore_backup().await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct BackupManager {
    original_path: PathBuf,
    backup_path: PathBuf,
}

impl BackupManager {
    /// Create a manager for the binary at `installed_path`.
    pub fn new(installed_path: PathBuf) -> Self {
        let mut backup_path = installed_path.clone();
        backup_path.set_file_name(format!(
            "{}{}",
            installed_path.file_name().unwrap_or_default().to_string_lossy(),
            BACKUP_SUFFIX
        ));

        Self {
            original_path: installed_path,
            backup_path,
        }
    }

    /// Move the installed binary aside to the backup path.
    ///
    /// Returns the backup path, or `None` when there was nothing installed.
    /// Any previous backup is replaced. A directory at the install path is
    /// never moved; that is [`InstallError::TargetNotFile`].
    pub async fn rotate(&self) -> Result<Option<PathBuf>, InstallError> {
        let metadata = match fs::symlink_metadata(&self.original_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No existing binary at {:?}, nothing to back up", self.original_path);
                return Ok(None);
            }
            Err(e) => return Err(InstallError::io("inspect installed binary", &self.original_path, e)),
        };
        if metadata.is_dir() {
            return Err(InstallError::TargetNotFile {
                path: self.original_path.clone(),
            });
        }

        if self.backup_path.exists() {
            debug!("Removing old backup at {:?}", self.backup_path);
            fs::remove_file(&self.backup_path)
                .await
                .map_err(|e| InstallError::io("remove old backup", &self.backup_path, e))?;
        }

        info!("Backing up {:?} to {:?}", self.original_path, self.backup_path);
        fs::rename(&self.original_path, &self.backup_path)
            .await
            .map_err(|e| InstallError::io("create backup", &self.original_path, e))?;

        Ok(Some(self.backup_path.clone()))
    }

    /// Put the backup back in place of the installed binary.
    ///
    /// Retries a few times because Windows refuses to replace an executable
    /// that is still running.
    pub async fn restore_backup(&self) -> Result<(), InstallError> {
        if !self.backup_path.exists() {
            return Err(InstallError::BackupMissing {
                path: self.backup_path.clone(),
            });
        }

        warn!("Restoring from backup at {:?}", self.backup_path);

        const MAX_ATTEMPTS: u32 = 3;
        let mut attempts = 0;

        loop {
            match self.attempt_restore().await {
                Ok(()) => {
                    info!("Successfully restored from backup");
                    return Ok(());
                }
                Err(e) if attempts < MAX_ATTEMPTS - 1 => {
                    warn!("Restore attempt {} failed: {}. Retrying...", attempts + 1, e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt_restore(&self) -> Result<(), InstallError> {
        if self.original_path.exists() {
            fs::remove_file(&self.original_path)
                .await
                .map_err(|e| InstallError::io("remove current binary", &self.original_path, e))?;
        }

        fs::rename(&self.backup_path, &self.original_path)
            .await
            .map_err(|e| InstallError::io("restore backup", &self.backup_path, e))
    }

    pub fn backup_exists(&self) -> bool {
        self.backup_path.exists()
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }
}
