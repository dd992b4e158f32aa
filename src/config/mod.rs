//! User configuration.
//!
//! The only persisted state is [`RememberedSettings`]: the install directory,
//! the platform, and the time of the last successful update. It is read once
//! at startup and written once after an install. A missing or corrupt file is
//! never fatal.

pub mod settings;

pub use settings::{RememberedSettings, SettingsStore, TomlSettingsStore};
