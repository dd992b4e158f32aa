//! The Chrome for Testing release catalog.
//!
//! The upstream dashboard publishes one section per release channel, each with
//! the channel's current version and a table of download URLs keyed by
//! artifact kind (`chrome`, `chromedriver`, `chrome-headless-shell`) and
//! platform (`linux64`, `mac-arm64`, `mac-x64`, `win32`, `win64`).
//!
//! This module normalizes that page into a [`Catalog`]:
//!
//! ```text
//! Catalog
//! └── Channel (stable | beta | dev | canary)
//!     └── ChannelInfo
//!         ├── version: "131.0.6778.85"
//!         └── downloads
//!             └── artifact kind ("chromedriver")
//!                 └── platform ("win64") → URL
//! ```
//!
//! - [`parser`] - Pure HTML → [`Catalog`] transform, no network access
//! - [`fetch`] - HTTP retrieval of the raw page
//!
//! A catalog is built fresh from every fetch and never mutated afterwards.

pub mod fetch;
pub mod parser;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use fetch::CatalogClient;
pub use parser::{ParseError, parse};

/// Artifact kind as published in the catalog, e.g. `chromedriver`.
pub type ArtifactKind = String;

/// Platform identifier as published in the catalog, e.g. `win64`.
pub type PlatformId = String;

/// Download table of one channel: artifact kind → platform → URL.
pub type Downloads = BTreeMap<ArtifactKind, BTreeMap<PlatformId, String>>;

/// Release channels published by Chrome for Testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// The channel the update engine tracks.
    Stable,
    /// Beta channel.
    Beta,
    /// Dev channel.
    Dev,
    /// Canary channel.
    Canary,
}

impl Channel {
    /// Every channel, in publication order.
    pub const ALL: [Self; 4] = [Self::Stable, Self::Beta, Self::Dev, Self::Canary];

    /// Name used as the section id on the catalog page.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Beta => "beta",
            Self::Dev => "dev",
            Self::Canary => "canary",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown channel '{s}' (expected stable, beta, dev or canary)"))
    }
}

/// Version and downloads of a single channel.
///
/// A `ChannelInfo` always carries a non-empty version; the constructor
/// rejects blank versions so a half-parsed section can never surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelInfo {
    version: String,
    downloads: Downloads,
}

impl ChannelInfo {
    /// Create a channel entry, or `None` if `version` is blank.
    pub fn new(version: impl Into<String>) -> Option<Self> {
        let version = version.into().trim().to_string();
        if version.is_empty() {
            return None;
        }
        Some(Self {
            version,
            downloads: Downloads::new(),
        })
    }

    /// Record a download URL. A later entry for the same kind/platform wins.
    pub fn add_download(
        &mut self,
        kind: impl Into<ArtifactKind>,
        platform: impl Into<PlatformId>,
        url: impl Into<String>,
    ) {
        self.downloads.entry(kind.into()).or_default().insert(platform.into(), url.into());
    }

    /// The channel's published version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Every download recorded for this channel.
    pub fn downloads(&self) -> &Downloads {
        &self.downloads
    }

    /// Look up the URL of `kind` for `platform`.
    pub fn download_url(&self, kind: &str, platform: &str) -> Option<&str> {
        self.downloads.get(kind)?.get(platform).map(String::as_str)
    }

    /// Platforms that publish `kind`, sorted.
    pub fn platforms_for(&self, kind: &str) -> Vec<&str> {
        self.downloads
            .get(kind)
            .map(|platforms| platforms.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Normalized view of the catalog page: channel → [`ChannelInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    channels: BTreeMap<Channel, ChannelInfo>,
}

impl Catalog {
    pub(crate) fn insert(&mut self, channel: Channel, info: ChannelInfo) {
        self.channels.insert(channel, info);
    }

    /// Information for `channel`, if it was published.
    pub fn channel(&self, channel: Channel) -> Option<&ChannelInfo> {
        self.channels.get(&channel)
    }

    /// Shortcut for the stable channel.
    pub fn stable(&self) -> Option<&ChannelInfo> {
        self.channel(Channel::Stable)
    }

    /// Iterate published channels in publication order.
    pub fn channels(&self) -> impl Iterator<Item = (Channel, &ChannelInfo)> {
        self.channels.iter().map(|(channel, info)| (*channel, info))
    }

    /// Number of published channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel was found.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl FromIterator<(Channel, ChannelInfo)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (Channel, ChannelInfo)>>(iter: T) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}
