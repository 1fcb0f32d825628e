// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Application CRD availability checking

use crate::constants::application::{API_VERSION, GROUP, KIND, VERSION};
use crate::error::{HarbormasterError, Result};
use kube::{discovery::Discovery, Client};
use tracing::{debug, info, instrument};

/// Fail unless the cluster serves the ArgoCD Application resource.
#[instrument(skip(client))]
pub async fn ensure_application_crd(client: &Client) -> Result<()> {
    if check_application_crd_exists(client).await? {
        info!("Application CRD ({}) is available", API_VERSION);
        Ok(())
    } else {
        Err(HarbormasterError::ApplicationCrdMissing(API_VERSION.to_string()))
    }
}

/// Check if the Application CRD exists by attempting to discover it.
async fn check_application_crd_exists(client: &Client) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[GROUP])
        .run()
        .await?;

    for group in discovery.groups() {
        if group.name() != GROUP {
            continue;
        }
        for (ar, _) in group.recommended_resources() {
            debug!("Discovered {}/{} {}", ar.group, ar.version, ar.kind);
            if ar.kind == KIND && ar.version == VERSION {
                return Ok(true);
            }
        }
    }

    Ok(false)
}
