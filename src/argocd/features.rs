// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Server capability gating.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Capabilities that depend on the ArgoCD server version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    MultipleApplicationSources,
    ManagedNamespaceMetadata,
}

impl Feature {
    /// First server release that accepts this spec shape
    pub fn min_version(&self) -> ServerVersion {
        match self {
            Feature::MultipleApplicationSources => ServerVersion::new(2, 6, 3),
            Feature::ManagedNamespaceMetadata => ServerVersion::new(2, 6, 0),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::MultipleApplicationSources => write!(f, "multiple application sources"),
            Feature::ManagedNamespaceMetadata => write!(f, "managed namespace metadata"),
        }
    }
}

/// Answers whether the connected server supports a capability
#[cfg_attr(test, automock)]
pub trait FeatureOracle: Send + Sync {
    fn is_supported(&self, feature: Feature) -> bool;
}

#[derive(Error, Debug)]
#[error("invalid server version '{0}'")]
pub struct InvalidVersion(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ServerVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ServerVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ServerVersion {
    type Err = InvalidVersion;

    /// Accepts ArgoCD style versions such as `v2.9.3+6eba5be` or `2.10.0-rc1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let core = trimmed
            .strip_prefix('v')
            .unwrap_or(trimmed)
            .split(['+', '-'])
            .next()
            .unwrap_or_default();

        let mut parts = core.split('.');
        let mut next = |required: bool| -> Result<u64, InvalidVersion> {
            match parts.next() {
                Some(p) => p.parse().map_err(|_| InvalidVersion(s.to_string())),
                None if required => Err(InvalidVersion(s.to_string())),
                None => Ok(0),
            }
        };

        let major = next(true)?;
        let minor = next(true)?;
        let patch = next(false)?;

        Ok(ServerVersion::new(major, minor, patch))
    }
}

/// Feature gates derived from a known server version.
/// Without a version every feature is assumed to be available.
#[derive(Debug, Clone)]
pub struct VersionFeatures {
    version: Option<ServerVersion>,
}

impl VersionFeatures {
    pub fn new(version: Option<ServerVersion>) -> Self {
        Self { version }
    }
}

impl FeatureOracle for VersionFeatures {
    fn is_supported(&self, feature: Feature) -> bool {
        self.version.is_none_or(|v| v >= feature.min_version())
    }
}
