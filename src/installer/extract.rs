//! All-or-nothing zip extraction.
//!
//! Entries are unpacked into a hidden staging directory created inside the
//! destination. Only once every entry has been written are the top-level
//! entries moved into the destination itself, so a corrupt archive never
//! leaves a partial tree behind. Same-named entries from an earlier
//! extraction are moved aside first and put back if any move fails.

use super::InstallError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Extract `archive` into `destination_dir`, replacing same-named entries.
///
/// Returns the top-level paths that were placed in `destination_dir`.
pub(crate) fn extract_archive(
    archive: File,
    destination_dir: &Path,
) -> Result<Vec<PathBuf>, InstallError> {
    fs::create_dir_all(destination_dir)
        .map_err(|e| InstallError::io("create extraction directory", destination_dir, e))?;

    let staging = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(destination_dir)
        .map_err(|e| InstallError::io("create staging directory", destination_dir, e))?;

    let count = unpack(archive, staging.path())?;
    debug!("Unpacked {} archive entries into {}", count, staging.path().display());

    let mut names = Vec::new();
    let entries = fs::read_dir(staging.path())
        .map_err(|e| InstallError::io("read staging directory", staging.path(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| InstallError::io("read staging directory", staging.path(), e))?;
        names.push(entry.file_name());
    }

    let replaced = tempfile::Builder::new()
        .prefix(".replaced-")
        .tempdir_in(destination_dir)
        .map_err(|e| InstallError::io("create holding directory", destination_dir, e))?;

    let mut moved_aside = Vec::new();
    let mut placed = Vec::new();
    let result = names.iter().try_for_each(|name| {
        let target = destination_dir.join(name);
        if fs::symlink_metadata(&target).is_ok() {
            fs::rename(&target, replaced.path().join(name))
                .map_err(|e| InstallError::io("replace previous extraction", &target, e))?;
            moved_aside.push(name.clone());
        }
        fs::rename(staging.path().join(name), &target)
            .map_err(|e| InstallError::io("move extracted entry", &target, e))?;
        trace!("Placed {}", target.display());
        placed.push(target);
        Ok::<(), InstallError>(())
    });

    if let Err(e) = result {
        roll_back(destination_dir, replaced.path(), &placed, &moved_aside);
        return Err(e);
    }

    Ok(placed)
}

/// Undo a partial move: drop what was placed, return what was moved aside.
fn roll_back(
    destination_dir: &Path,
    replaced: &Path,
    placed: &[PathBuf],
    moved_aside: &[OsString],
) {
    for target in placed {
        if let Err(e) = remove_path(target) {
            warn!("Could not remove {}: {}", target.display(), e);
        }
    }
    for name in moved_aside {
        let target = destination_dir.join(name);
        if let Err(e) = fs::rename(replaced.join(name), &target) {
            warn!("Could not restore {}: {}", target.display(), e);
        }
    }
}

fn unpack(archive: File, staging: &Path) -> Result<usize, InstallError> {
    let mut archive = zip::ZipArchive::new(archive).map_err(|e| InstallError::ExtractFailed {
        reason: format!("not a valid zip archive: {e}"),
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| InstallError::ExtractFailed {
            reason: format!("cannot read entry {i}: {e}"),
        })?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(InstallError::ExtractFailed {
                reason: format!("entry '{}' escapes the extraction directory", entry.name()),
            });
        };
        let out_path = staging.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| extract_io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| extract_io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| extract_io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| extract_io(&out_path, e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                .map_err(|e| extract_io(&out_path, e))?;
        }
    }

    Ok(archive.len())
}

fn remove_path(target: &Path) -> io::Result<()> {
    if fs::symlink_metadata(target)?.is_dir() { fs::remove_dir_all(target) } else { fs::remove_file(target) }
}

fn extract_io(path: &Path, e: io::Error) -> InstallError {
    InstallError::ExtractFailed {
        reason: format!("{}: {e}", path.display()),
    }
}
