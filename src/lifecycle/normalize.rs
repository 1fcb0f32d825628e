// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Spec normalization and capability checks, run before anything is sent.

use tracing::debug;

use crate::argocd::features::{Feature, FeatureOracle};
use crate::error::{HarbormasterError, Result};
use crate::types::ApplicationSpec;

/// Bring a desired spec into the shape the server expects.
///
/// A single entry in `sources` is moved to `source` so older servers accept it.
/// Multiple sources and managed namespace metadata are rejected when the
/// server lacks the matching capability.
pub fn normalize_spec(spec: &mut ApplicationSpec, features: &dyn FeatureOracle) -> Result<()> {
    let sources = spec.sources.take().unwrap_or_default();

    match sources.len() {
        0 => {}
        1 => {
            debug!("Collapsing single entry sources into source");
            spec.source = sources.into_iter().next();
        }
        _ => {
            spec.sources = Some(sources);
            require(features, Feature::MultipleApplicationSources)?;
        }
    }

    let wants_namespace_metadata = spec
        .sync_policy
        .as_ref()
        .is_some_and(|p| p.managed_namespace_metadata.is_some());
    if wants_namespace_metadata {
        require(features, Feature::ManagedNamespaceMetadata)?;
    }

    Ok(())
}

fn require(features: &dyn FeatureOracle, feature: Feature) -> Result<()> {
    if features.is_supported(feature) {
        Ok(())
    } else {
        Err(HarbormasterError::FeatureNotSupported(feature))
    }
}
