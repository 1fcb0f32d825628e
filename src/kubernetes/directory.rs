// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Application directory backed by the Kubernetes API server ArgoCD watches.

use async_trait::async_trait;
use kube::{
    api::{DeleteParams, ListParams, Patch, PatchParams, PostParams},
    Api, Client, ResourceExt,
};
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::argocd::directory::{ApplicationDirectory, DirectoryError};
use crate::constants::{application::RESOURCES_FINALIZER, OPERATOR_NAME};
use crate::types::state::DEFAULT_NAMESPACE;
use crate::types::{Application, Identity};

pub struct KubeApplicationDirectory {
    client: Client,
}

impl KubeApplicationDirectory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Application> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn api_for(&self, application: &Application) -> Api<Application> {
        let namespace = application
            .namespace()
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        self.api(&namespace)
    }
}

#[async_trait]
impl ApplicationDirectory for KubeApplicationDirectory {
    #[instrument(skip(self), fields(application = %identity))]
    async fn list(&self, identity: &Identity) -> Result<Vec<Application>, DirectoryError> {
        let lp = ListParams::default().fields(&format!("metadata.name={}", identity.name));
        let list = self.api(&identity.namespace).list(&lp).await?;

        debug!("Found {} applications", list.items.len());
        Ok(list.items)
    }

    #[instrument(skip(self, application), fields(application = %application.name_any()))]
    async fn create(
        &self,
        application: &Application,
    ) -> Result<Option<Application>, DirectoryError> {
        let created = self
            .api_for(application)
            .create(&PostParams::default(), application)
            .await?;

        Ok(Some(created))
    }

    #[instrument(skip(self, application), fields(application = %application.name_any()))]
    async fn update(&self, application: &Application) -> Result<Application, DirectoryError> {
        let api = self.api_for(application);
        let name = application.name_any();

        // Server-side apply creates missing objects, so pin the apply to the
        // live resourceVersion to turn a concurrent delete into a conflict
        let Some(current) = api.get_opt(&name).await? else {
            return Err(DirectoryError::NotFound(name));
        };
        let mut pinned = application.clone();
        pinned.metadata.resource_version = current.resource_version();

        let pp = PatchParams::apply(OPERATOR_NAME).force();
        match api.patch(&name, &pp, &Patch::Apply(&pinned)).await {
            Ok(updated) => Ok(updated),
            Err(kube::Error::Api(resp)) if resp.code == 409 => {
                if api.get_opt(&name).await?.is_none() {
                    debug!("Application {} vanished while applying", name);
                    return Err(DirectoryError::NotFound(name));
                }
                Err(DirectoryError::Transport(resp.message))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(application = %identity))]
    async fn delete(&self, identity: &Identity, cascade: bool) -> Result<(), DirectoryError> {
        let api = self.api(&identity.namespace);
        let current = api.get(&identity.name).await?;

        // ArgoCD only prunes child resources while its finalizer is present
        if let Some(finalizers) = finalizers_for_cascade(&current, cascade) {
            info!(
                "Setting finalizers {:?} on application {} before deletion",
                finalizers, identity
            );
            let patch = json!({ "metadata": { "finalizers": finalizers } });
            api.patch(&identity.name, &PatchParams::default(), &Patch::Merge(&patch))
                .await?;
        }

        api.delete(&identity.name, &DeleteParams::background())
            .await?;

        Ok(())
    }
}

/// Finalizer list that realises the cascade choice, or `None` when no change is needed
fn finalizers_for_cascade(application: &Application, cascade: bool) -> Option<Vec<String>> {
    let present = application.has_finalizer(RESOURCES_FINALIZER);
    if present == cascade {
        return None;
    }

    let mut finalizers: Vec<String> = application
        .finalizers()
        .iter()
        .filter(|f| f.as_str() != RESOURCES_FINALIZER)
        .cloned()
        .collect();

    if cascade {
        finalizers.push(RESOURCES_FINALIZER.to_string());
    }

    Some(finalizers)
}
