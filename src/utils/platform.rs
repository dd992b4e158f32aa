//! Platform helpers: user path expansion and executable lookup.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Whether the crate is running on Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Expand a path typed by the user: leading `~` and `$VAR` / `${VAR}`.
///
/// Surrounding whitespace and matching quotes (as pasted from Explorer's
/// "Copy as path") are stripped first.
///
/// # Examples
///
/// ```rust,no_run
/// use chromedriver_sync::utils::platform::resolve_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let dir = resolve_path("~/bin")?;
/// assert!(dir.is_absolute());
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);

    let expanded = shellexpand::full(unquoted).with_context(|| {
        let platform_vars = if is_windows() {
            "Common Windows variables: $USERPROFILE, $APPDATA, $TEMP"
        } else {
            "Common Unix variables: $HOME, $USER, $TMPDIR"
        };
        format!("Failed to expand environment variables in path: {unquoted}\n\n{platform_vars}")
    })?;

    Ok(PathBuf::from(expanded.into_owned()))
}

/// Locate `name` on `PATH`.
#[must_use]
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Whether `dir` is one of the directories listed in `PATH`.
#[must_use]
pub fn dir_on_path(dir: &Path) -> bool {
    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };
    let wanted = normalize(dir);
    std::env::split_paths(&path_var).any(|entry| normalize(&entry) == wanted)
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
