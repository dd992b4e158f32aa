//! Version parsing and classification for ChromeDriver releases.
//!
//! - [`comparison`] - Dotted-numeric version ordering and the
//!   [`Classification`](comparison::Classification) the update engine acts on

pub mod comparison;

pub use comparison::{Classification, DottedVersion, VersionComparisonResult, compare};
