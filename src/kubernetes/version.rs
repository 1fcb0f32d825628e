// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ArgoCD server version discovery from its Deployment.

use k8s_openapi::api::apps::v1::Deployment;
use kube::{api::ListParams, Api, Client, ResourceExt};
use tracing::{debug, instrument, warn};

use crate::argocd::features::ServerVersion;
use crate::constants::server::{CONTAINER, SELECTOR, VERSION_LABEL};

/// Find the version of the ArgoCD API server running in the cluster.
///
/// The `app.kubernetes.io/version` label wins over the container image tag.
/// Returns `None` when no deployment is visible or none carries a usable version.
#[instrument(skip(client))]
pub async fn discover_server_version(client: &Client) -> Option<ServerVersion> {
    let api: Api<Deployment> = Api::all(client.clone());
    let deployments = match api.list(&ListParams::default().labels(SELECTOR)).await {
        Ok(list) => list.items,
        Err(e) => {
            warn!("Unable to list ArgoCD server deployments: {}", e);
            return None;
        }
    };

    debug!("Found {} ArgoCD server deployments", deployments.len());
    deployments.iter().find_map(version_of)
}

fn version_of(deployment: &Deployment) -> Option<ServerVersion> {
    deployment
        .labels()
        .get(VERSION_LABEL)
        .and_then(|v| v.parse().ok())
        .or_else(|| image_tag(deployment)?.parse().ok())
}

fn image_tag(deployment: &Deployment) -> Option<&str> {
    let containers = &deployment.spec.as_ref()?.template.spec.as_ref()?.containers;
    let container = containers
        .iter()
        .find(|c| c.name == CONTAINER)
        .or_else(|| containers.first())?;

    // Drop any digest, then split off the tag; a ':' before a '/' is a registry port
    let image = container.image.as_deref()?.split('@').next()?;
    let (_, tag) = image.rsplit_once(':')?;
    (!tag.contains('/')).then_some(tag)
}
