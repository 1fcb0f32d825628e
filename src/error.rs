// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use thiserror::Error;

use crate::argocd::features::Feature;

#[derive(Error, Debug)]
pub enum HarbormasterError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("found multiple applications matching name '{name}' and namespace '{namespace}'")]
    AmbiguousIdentity { name: String, namespace: String },

    #[error("{0} is not supported by the connected ArgoCD server")]
    FeatureNotSupported(Feature),

    #[error("failed to {operation} {kind} {name}: {detail}")]
    Api {
        operation: &'static str,
        kind: &'static str,
        name: String,
        detail: String,
    },

    #[error("application {name} could not be created: unknown reason")]
    CreatedWithoutResult { name: String },

    #[error("application {name} in namespace {namespace} still present after {timeout:?}")]
    ConvergenceTimeout {
        name: String,
        namespace: String,
        timeout: Duration,
    },

    #[error("invalid resource id '{0}', expected <name>:<namespace>")]
    InvalidResourceId(String),

    #[error("resource has no id, it was never created or has been removed")]
    MissingIdentity,

    #[error("application {current} cannot become {desired}: name and namespace are fixed, delete and re-create it")]
    IdentityChanged { current: String, desired: String },

    #[error("Application CRD ({0}) is not served by the connected cluster")]
    ApplicationCrdMissing(String),

    #[error("{operation} timed out after {timeout:?}")]
    OperationTimedOut {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("{operation} was cancelled")]
    Cancelled { operation: &'static str },
}

pub type Result<T> = std::result::Result<T, HarbormasterError>;
