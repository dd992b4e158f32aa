//! Where the driver lives inside a release archive and after installation.
//!
//! Chrome for Testing archives contain a single top-level directory named
//! after the platform:
//!
//! ```text
//! chromedriver-win64.zip
//! └── chromedriver-win64/
//!     ├── LICENSE.chromedriver
//!     ├── THIRD_PARTY_NOTICES.chromedriver
//!     └── chromedriver.exe
//! ```

use std::path::{Path, PathBuf};

/// Archive and install layout of the driver for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverLayout {
    platform: String,
}

impl DriverLayout {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// `chromedriver.exe` on Windows platforms, `chromedriver` elsewhere.
    pub fn executable_name(&self) -> &'static str {
        if self.platform.starts_with("win") { "chromedriver.exe" } else { "chromedriver" }
    }

    /// Top-level directory of the archive, e.g. `chromedriver-win64`.
    pub fn archive_dir_name(&self) -> String {
        format!("chromedriver-{}", self.platform)
    }

    /// Expected binary path under an extracted archive root.
    pub fn source_path(&self, extracted_root: &Path) -> PathBuf {
        extracted_root.join(self.archive_dir_name()).join(self.executable_name())
    }

    /// Path the binary is installed to inside `destination_dir`.
    pub fn installed_path(&self, destination_dir: &Path) -> PathBuf {
        destination_dir.join(self.executable_name())
    }
}
