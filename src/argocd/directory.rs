// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The directory of Application records the controller reconciles against.

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::types::{Application, Identity};

/// Errors returned by an [`ApplicationDirectory`].
/// "not found" is the only class callers treat differently.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("NotFound: {0}")]
    NotFound(String),

    #[error("{0}")]
    Transport(String),
}

impl DirectoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound(_))
    }
}

impl From<kube::Error> for DirectoryError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => DirectoryError::NotFound(resp.message),
            e => DirectoryError::Transport(e.to_string()),
        }
    }
}

/// List/create/update/delete access to Application records keyed by name and namespace
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApplicationDirectory: Send + Sync {
    /// Applications matching the identity. Normally zero or one.
    async fn list(&self, identity: &Identity) -> Result<Vec<Application>, DirectoryError>;

    /// Submit a new Application. `None` means the directory accepted the call
    /// without returning the created object.
    async fn create(&self, application: &Application)
        -> Result<Option<Application>, DirectoryError>;

    async fn update(&self, application: &Application) -> Result<Application, DirectoryError>;

    /// Delete the Application; `cascade` also removes the resources it produced
    async fn delete(&self, identity: &Identity, cascade: bool) -> Result<(), DirectoryError>;
}
