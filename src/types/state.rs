// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Locally persisted desired state of a managed Application.

use std::collections::BTreeMap;

use kube::api::ObjectMeta;
use serde::{Deserialize, Serialize};

use crate::types::application::{Application, ApplicationSpec, ApplicationStatus};
use crate::types::identity::Identity;

/// Namespace ArgoCD looks for Applications in when none is given
pub const DEFAULT_NAMESPACE: &str = "argocd";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ApplicationMetadata {
    pub fn namespace_or_default(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn to_object_meta(&self) -> ObjectMeta {
        ObjectMeta {
            name: Some(self.name.clone()),
            namespace: Some(self.namespace_or_default().to_string()),
            labels: (!self.labels.is_empty()).then(|| self.labels.clone()),
            annotations: (!self.annotations.is_empty()).then(|| self.annotations.clone()),
            ..Default::default()
        }
    }

    /// Keep only the caller-owned parts of remote metadata
    pub fn from_object_meta(meta: &ObjectMeta) -> Self {
        Self {
            name: meta.name.clone().unwrap_or_default(),
            namespace: meta.namespace.clone(),
            labels: meta.labels.clone().unwrap_or_default(),
            annotations: meta
                .annotations
                .as_ref()
                .map(|a| {
                    a.iter()
                        .filter(|(k, _)| !k.starts_with("kubectl.kubernetes.io/"))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

fn default_cascade() -> bool {
    true
}

/// Desired state plus the bookkeeping the controller keeps between passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    /// Set once the Application exists remotely, cleared when it is gone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identity>,
    pub metadata: ApplicationMetadata,
    pub spec: ApplicationSpec,
    /// Delete the resources the Application produced when it is removed
    #[serde(default = "default_cascade")]
    pub cascade: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
}

impl ApplicationState {
    pub fn new(metadata: ApplicationMetadata, spec: ApplicationSpec) -> Self {
        Self {
            id: None,
            metadata,
            spec,
            cascade: true,
            status: None,
        }
    }

    /// Skeleton state for an Application that is adopted by id
    pub fn imported(identity: Identity) -> Self {
        let metadata = ApplicationMetadata {
            name: identity.name.clone(),
            namespace: Some(identity.namespace.clone()),
            ..Default::default()
        };
        Self {
            id: Some(identity),
            ..Self::new(metadata, ApplicationSpec::default())
        }
    }

    /// Identity the desired metadata addresses
    pub fn desired_identity(&self) -> Identity {
        Identity::new(
            self.metadata.name.clone(),
            self.metadata.namespace_or_default(),
        )
    }

    pub fn has_changes(&self, prior: &ApplicationState) -> bool {
        self.metadata != prior.metadata || self.spec != prior.spec
    }

    /// Forget the remote object
    pub fn clear(&mut self) {
        self.id = None;
        self.status = None;
    }

    /// Reflect the authoritative remote record into local state
    pub fn observe(&mut self, application: &Application) {
        self.metadata = ApplicationMetadata::from_object_meta(&application.metadata);
        self.spec = application.spec.clone();
        self.status = application.status.clone();
    }
}
