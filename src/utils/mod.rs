//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Directory creation and atomic writes
//! - [`http`] - Shared HTTP client construction with timeouts
//! - [`platform`] - User path expansion and executable lookup
//! - [`progress`] - Progress bars and spinners for downloads

pub mod fs;
pub mod http;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, ensure_dir};
pub use platform::{is_windows, resolve_path};
pub use progress::{ProgressBar, ProgressStyle};
