//! chromedriver-sync - keep a local ChromeDriver in step with Chrome for Testing
//!
//! The crate reads the [Chrome for Testing] availability dashboard, compares
//! the stable channel's version with the installed driver, and when the local
//! driver is older or missing downloads the release archive, unpacks it, and
//! installs the binary, keeping the previous one as `<name>.bak`.
//!
//! # Architecture
//!
//! ```text
//! catalog page ─► catalog::parse ─► Catalog ─┐
//!                                            ├─► engine::UpdateEngine ─► installer::ArtifactInstaller
//! probe (--version) ─► local version ────────┘           │
//!                                         version::compare
//! ```
//!
//! - [`catalog`] - catalog model, HTML parser, and page fetcher
//! - [`version`] - dotted numeric version comparison
//! - [`installer`] - streaming download, zip extraction, binary placement, backups
//! - [`engine`] - the update state machine tying the above together
//! - [`probe`] - reading the installed driver's version
//! - [`config`] - remembered settings between runs
//! - [`core`] - user-facing error presentation
//! - [`cli`] - command-line front end
//!
//! # Example
//!
//! ```rust,no_run
//! use chromedriver_sync::catalog::CatalogClient;
//! use chromedriver_sync::engine::{EngineOptions, UpdateEngine, UpdateRequest};
//! use chromedriver_sync::installer::ArtifactInstaller;
//! use std::path::PathBuf;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let raw_catalog = CatalogClient::new()?.fetch_page().await?;
//!
//! let mut engine = UpdateEngine::new(ArtifactInstaller::new("linux64")?, EngineOptions::default());
//! let report = engine
//!     .run(&UpdateRequest {
//!         raw_catalog,
//!         local_version: Some("130.0.6723.91".to_string()),
//!         staging_dir: PathBuf::from("staging"),
//!         destination_dir: PathBuf::from("/opt/drivers"),
//!     })
//!     .await?;
//!
//! if let Some(installed) = report.installed() {
//!     println!("Installed at {}", installed.installed_path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [Chrome for Testing]: https://googlechromelabs.github.io/chrome-for-testing/

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod engine;
pub mod installer;
pub mod probe;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
