//! Test utilities for chromedriver-sync
//!
//! Helpers shared by unit and integration tests:
//! - [`init_test_logging`] wires `tracing` into the test harness output
//! - [`fixtures`] builds catalog pages and driver archives in memory
//!
//! # Example
//!
//! ```rust,ignore
//! use chromedriver_sync::test_utils::fixtures::{CatalogPage, driver_archive};
//!
//! let page = CatalogPage::new()
//!     .channel("stable", "131.0.6778.85", &[("chromedriver", "win64", "http://127.0.0.1/cd.zip")])
//!     .render();
//! let zip = driver_archive("win64", b"driver bytes");
//! ```

pub mod fixtures;

pub use fixtures::{CatalogPage, driver_archive, zip_bytes};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, else `RUST_LOG`;
/// with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=chromedriver_sync=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
