// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::argocd::features::ServerVersion;
use crate::constants::{convergence, defaults};

/// Controller configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Overrides the ArgoCD server version discovered in the cluster.
    /// When neither is known every feature is assumed to be supported.
    pub server_version: Option<ServerVersion>,
    pub timeouts: Timeouts,
    pub delays: DelayPolicy,
}

/// End-to-end bounds for each lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

/// Deliberate waits taken by the lifecycle controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayPolicy {
    /// Wait after a successful update before re-reading the application
    pub update_settle: Duration,
    /// Deadline for a deleted application to disappear from listings
    pub convergence_timeout: Duration,
    pub poll_interval: Duration,
    pub poll_max_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        let timeout = Duration::from_secs(defaults::OPERATION_TIMEOUT_SECS);
        Self {
            create: timeout,
            update: timeout,
            delete: timeout,
        }
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            update_settle: Duration::from_secs(defaults::UPDATE_SETTLE_SECS),
            convergence_timeout: Duration::from_secs(convergence::TIMEOUT_SECS),
            poll_interval: Duration::from_millis(convergence::POLL_INTERVAL_MILLIS),
            poll_max_interval: Duration::from_millis(convergence::POLL_MAX_INTERVAL_MILLIS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_version: None,
            timeouts: Timeouts::default(),
            delays: DelayPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let server_version = match env::var("ARGOCD_SERVER_VERSION") {
            Ok(v) if !v.trim().is_empty() => Some(
                v.parse::<ServerVersion>()
                    .context("ARGOCD_SERVER_VERSION is not a valid version")?,
            ),
            _ => None,
        };

        let defaults = Timeouts::default();
        let timeouts = Timeouts {
            create: secs_from_env("APPLICATION_CREATE_TIMEOUT_SECS", defaults.create)?,
            update: secs_from_env("APPLICATION_UPDATE_TIMEOUT_SECS", defaults.update)?,
            delete: secs_from_env("APPLICATION_DELETE_TIMEOUT_SECS", defaults.delete)?,
        };

        let delays = DelayPolicy {
            update_settle: secs_from_env(
                "APPLICATION_UPDATE_SETTLE_SECS",
                Duration::from_secs(defaults::UPDATE_SETTLE_SECS),
            )?,
            convergence_timeout: secs_from_env(
                "APPLICATION_DELETE_CONVERGENCE_SECS",
                Duration::from_secs(convergence::TIMEOUT_SECS),
            )?,
            ..DelayPolicy::default()
        };

        Ok(Config {
            server_version,
            timeouts,
            delays,
        })
    }
}

fn secs_from_env(key: &str, default: Duration) -> Result<Duration> {
    match env::var(key) {
        Ok(v) => {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds, got '{}'", key, v))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(default),
    }
}
