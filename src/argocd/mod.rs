// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Interfaces to the ArgoCD server: the Application directory and feature gates.

pub mod directory;
pub mod features;
pub mod server;

pub use directory::{ApplicationDirectory, DirectoryError};
pub use features::{Feature, FeatureOracle, ServerVersion, VersionFeatures};
pub use server::{Clients, ServerInterface};
