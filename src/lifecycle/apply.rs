// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The single mutating call of each lifecycle operation.

use std::time::Duration;

use kube::ResourceExt;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::argocd::directory::{ApplicationDirectory, DirectoryError};
use crate::error::{HarbormasterError, Result};
use crate::lifecycle::{api_error, single_match};
use crate::types::{Application, Identity};

/// Result of an update attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The Application no longer exists, nothing was sent
    Gone,
}

pub struct ApplyEngine<'a> {
    directory: &'a dyn ApplicationDirectory,
}

impl<'a> ApplyEngine<'a> {
    pub fn new(directory: &'a dyn ApplicationDirectory) -> Self {
        Self { directory }
    }

    /// Submit a new Application and return the identity it was created under
    #[instrument(skip(self, envelope), fields(application = %envelope.name_any()))]
    pub async fn create(&self, envelope: &Application) -> Result<Identity> {
        let name = envelope.name_any();

        let created = self
            .directory
            .create(envelope)
            .await
            .map_err(|e| api_error("create", &name, e))?;

        let Some(created) = created else {
            return Err(HarbormasterError::CreatedWithoutResult { name });
        };

        let namespace = envelope.namespace().unwrap_or_default();
        let identity = Identity::new(created.name_any(), namespace);
        info!("Created application {}", identity);
        Ok(identity)
    }

    /// Re-validate the identity, submit the update, then wait `settle` so the
    /// server has reported sync and health state for the new spec.
    #[instrument(skip(self, envelope, settle), fields(application = %identity))]
    pub async fn update(
        &self,
        identity: &Identity,
        envelope: &Application,
        settle: Duration,
    ) -> Result<UpdateOutcome> {
        let existing = match self.directory.list(identity).await {
            Ok(apps) => single_match(apps, identity)?,
            Err(DirectoryError::NotFound(_)) => None,
            Err(e) => return Err(api_error("list", &identity.name, e)),
        };

        if existing.is_none() {
            warn!("Application {} disappeared before update", identity);
            return Ok(UpdateOutcome::Gone);
        }

        match self.directory.update(envelope).await {
            Ok(_) => {}
            Err(DirectoryError::NotFound(_)) => {
                warn!("Application {} disappeared during update", identity);
                return Ok(UpdateOutcome::Gone);
            }
            Err(e) => return Err(api_error("update", &identity.name, e)),
        }

        info!("Updated application {}, waiting {:?} for status to settle", identity, settle);
        sleep(settle).await;

        Ok(UpdateOutcome::Updated)
    }

    /// Submit the delete. A missing Application counts as deleted.
    #[instrument(skip(self), fields(application = %identity))]
    pub async fn delete(&self, identity: &Identity, cascade: bool) -> Result<()> {
        match self.directory.delete(identity, cascade).await {
            Ok(()) => {
                info!("Deleted application {} (cascade: {})", identity, cascade);
                Ok(())
            }
            Err(DirectoryError::NotFound(_)) => {
                debug!("Application {} already gone", identity);
                Ok(())
            }
            Err(e) => Err(api_error("delete", &identity.name, e)),
        }
    }
}
