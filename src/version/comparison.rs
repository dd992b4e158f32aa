//! Version comparison for dotted-numeric release identifiers.
//!
//! Chrome for Testing publishes four-component versions such as
//! `131.0.6778.85`, which are not valid semantic versions. This module
//! provides a small ordered version type and the classification used by the
//! update engine to decide whether a local binary is outdated.
//!
//! # Examples
//!
//! ```rust
//! use chromedriver_sync::version::comparison::{Classification, compare};
//!
//! let result = compare("130.0.6723.91", "131.0.6778.85");
//! assert_eq!(result.classification, Classification::LocalOlder);
//! assert!(result.needs_update);
//!
//! // Components are compared as integers, not strings
//! let result = compare("9.0.0.0", "10.0.0.0");
//! assert_eq!(result.classification, Classification::LocalOlder);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a dotted-numeric version.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid version '{input}': {reason}")]
pub struct InvalidVersion {
    /// The rejected input.
    pub input: String,
    /// Why the input was rejected.
    pub reason: String,
}

/// A dot-separated numeric version such as `131.0.6778.85`.
///
/// Ordering is component-wise numeric. Missing trailing components compare
/// as zero, so `1.0` and `1.0.0.0` are equal.
#[derive(Debug, Clone)]
pub struct DottedVersion {
    components: Vec<u64>,
}

impl DottedVersion {
    /// Parse a version string, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidVersion`] when the input is empty, contains an empty
    /// component (`1..2`, `1.`), or a component that is not an unsigned
    /// integer fitting in `u64`.
    pub fn parse(input: &str) -> Result<Self, InvalidVersion> {
        let trimmed = input.trim();
        let invalid = |reason: &str| InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("version is empty"));
        }

        let mut components = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() {
                return Err(invalid("empty version component"));
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("version components must be numeric"));
            }
            let value = part.parse::<u64>().map_err(|_| invalid("version component out of range"))?;
            components.push(value);
        }

        Ok(Self {
            components,
        })
    }

    /// The parsed numeric components, as written.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for DottedVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl Ord for DottedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for DottedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DottedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DottedVersion {}

/// How a local version relates to the published target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Local and target are the same version.
    Equal,
    /// Local is ahead of the target (for example a beta or dev build).
    LocalNewer,
    /// Local is behind the target and should be updated.
    LocalOlder,
    /// At least one side could not be parsed; no update is attempted.
    Unparseable,
}

impl Classification {
    /// The classification seen from the other side of the comparison.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::LocalNewer => Self::LocalOlder,
            Self::LocalOlder => Self::LocalNewer,
            other => other,
        }
    }

    /// Human-readable status line used by the CLI.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Equal => "ChromeDriver is on the latest stable version",
            Self::LocalNewer => {
                "ChromeDriver is newer than the stable channel (probably a beta or dev build)"
            }
            Self::LocalOlder => "ChromeDriver is outdated",
            Self::Unparseable => "Version could not be parsed; unable to compare",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Equal => "equal",
            Self::LocalNewer => "local newer",
            Self::LocalOlder => "local older",
            Self::Unparseable => "unparseable",
        };
        f.write_str(label)
    }
}

/// Outcome of comparing a local version against a target version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionComparisonResult {
    /// The local version string as given.
    pub local: String,
    /// The target version string as given.
    pub target: String,
    /// Relationship between the two.
    pub classification: Classification,
    /// `true` iff `classification` is [`Classification::LocalOlder`].
    pub needs_update: bool,
}

impl VersionComparisonResult {
    fn new(local: &str, target: &str, classification: Classification) -> Self {
        Self {
            local: local.to_string(),
            target: target.to_string(),
            classification,
            needs_update: classification == Classification::LocalOlder,
        }
    }
}

/// Classify `local` against `target`.
///
/// Total: never fails or panics. Unparseable input on either side yields
/// [`Classification::Unparseable`] with `needs_update = false`.
pub fn compare(local: &str, target: &str) -> VersionComparisonResult {
    let classification = match (DottedVersion::parse(local), DottedVersion::parse(target)) {
        (Ok(l), Ok(t)) => match l.cmp(&t) {
            Ordering::Equal => Classification::Equal,
            Ordering::Greater => Classification::LocalNewer,
            Ordering::Less => Classification::LocalOlder,
        },
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("{}", e);
            Classification::Unparseable
        }
    };

    VersionComparisonResult::new(local, target, classification)
}
