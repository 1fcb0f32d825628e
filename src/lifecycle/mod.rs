// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Application lifecycle: create, read, update and delete against the directory.

pub mod apply;
pub mod controller;
pub mod guard;
pub mod normalize;
pub mod poller;

pub use controller::ApplicationController;

use crate::argocd::directory::DirectoryError;
use crate::constants::application::RESOURCE_KIND;
use crate::error::HarbormasterError;
use crate::types::{Application, Identity};

/// Uniform report for a failed directory call
pub(crate) fn api_error(operation: &'static str, name: &str, err: DirectoryError) -> HarbormasterError {
    HarbormasterError::Api {
        operation,
        kind: RESOURCE_KIND,
        name: name.to_string(),
        detail: err.to_string(),
    }
}

/// Reduce a listing to the single Application an identity may address.
/// More than one match means the directory is inconsistent.
pub(crate) fn single_match(
    mut applications: Vec<Application>,
    identity: &Identity,
) -> Result<Option<Application>, HarbormasterError> {
    match applications.len() {
        0 => Ok(None),
        1 => Ok(applications.pop()),
        _ => Err(HarbormasterError::AmbiguousIdentity {
            name: identity.name.clone(),
            namespace: identity.namespace.clone(),
        }),
    }
}
