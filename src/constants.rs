// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// ArgoCD Application resource coordinates
pub mod application {
    pub const GROUP: &str = "argoproj.io";
    pub const VERSION: &str = "v1alpha1";
    pub const KIND: &str = "Application";
    pub const API_VERSION: &str = "argoproj.io/v1alpha1";
    /// Resource kind used in error reports
    pub const RESOURCE_KIND: &str = "application";
    /// When present at deletion time, ArgoCD prunes the resources the Application produced
    pub const RESOURCES_FINALIZER: &str = "resources-finalizer.argocd.argoproj.io";
}

/// How the ArgoCD API server deployment is located to learn its version
pub mod server {
    pub const SELECTOR: &str = "app.kubernetes.io/name=argocd-server";
    pub const VERSION_LABEL: &str = "app.kubernetes.io/version";
    pub const CONTAINER: &str = "argocd-server";
}

/// The field manager name used for server-side apply
pub const OPERATOR_NAME: &str = "harbormaster";

/// Delete convergence polling configuration
pub mod convergence {
    /// Initial polling interval in milliseconds
    pub const POLL_INTERVAL_MILLIS: u64 = 500;
    /// Maximum polling interval in milliseconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_MILLIS: u64 = 10_000;
    /// Default deadline for a delete to be reflected in listings
    pub const TIMEOUT_SECS: u64 = 60;
}

/// Default lifecycle timings
pub mod defaults {
    /// End-to-end bound for create, update and delete
    pub const OPERATION_TIMEOUT_SECS: u64 = 300;
    /// Wait after an update so sync and health status catch up
    pub const UPDATE_SETTLE_SECS: u64 = 60;
}
