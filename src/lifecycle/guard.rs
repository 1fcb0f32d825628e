// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Collision guard run before an Application is created.

use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::argocd::directory::{ApplicationDirectory, DirectoryError};
use crate::error::Result;
use crate::lifecycle::{api_error, single_match};
use crate::types::{Identity, RemoteState};

/// Make sure creating `identity` will not collide with an existing Application.
///
/// An Application still in its soft-deletion window is waited out for its
/// declared grace period. Two or more matches fail without touching the directory.
#[instrument(skip(directory), fields(application = %identity))]
pub async fn guard_create(directory: &dyn ApplicationDirectory, identity: &Identity) -> Result<()> {
    let existing = match directory.list(identity).await {
        Ok(apps) => apps,
        Err(DirectoryError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(api_error("list", &identity.name, e)),
    };

    let Some(existing) = single_match(existing, identity)? else {
        debug!("No existing application, proceeding");
        return Ok(());
    };

    match existing.remote_state() {
        RemoteState::Active => {
            debug!("Application already listed, leaving duplicate handling to the directory");
        }
        RemoteState::SoftDeleting { grace_period } => {
            info!(
                "Existing application is being deleted, waiting {:?} for its grace period",
                grace_period
            );
            sleep(grace_period).await;
        }
    }

    Ok(())
}
