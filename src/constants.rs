//! Global constants used throughout the chromedriver-sync codebase.
//!
//! This module contains the upstream catalog location, network timeouts, and
//! the naming conventions of the Chrome for Testing archives. Defining them
//! centrally keeps the catalog contract in one place.

use std::time::Duration;

/// Default location of the Chrome for Testing availability dashboard.
pub const CATALOG_URL: &str = "https://googlechromelabs.github.io/chrome-for-testing/";

/// Timeout for fetching the catalog page.
///
/// The page is small; a stalled peer should fail fast.
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for downloading a release archive.
pub const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for establishing any TCP connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Artifact kind consumed by the update engine.
pub const DRIVER_ARTIFACT_KIND: &str = "chromedriver";

/// Platform used when neither the settings file nor the command line names one.
pub const DEFAULT_PLATFORM: &str = "win64";

/// Suffix appended to the previously installed binary before it is replaced.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Default staging directory (relative to the working directory) for downloads.
///
/// Must differ from every installed binary name, since the working directory
/// is also the default install target.
pub const DEFAULT_STAGING_DIR: &str = "chromedriver-download";

/// Environment variable overriding the settings file location.
pub const CONFIG_PATH_ENV: &str = "CHROMEDRIVER_SYNC_CONFIG";

/// Environment variable disabling progress bars.
pub const NO_PROGRESS_ENV: &str = "CHROMEDRIVER_SYNC_NO_PROGRESS";

/// Timeout for running `chromedriver --version`.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
