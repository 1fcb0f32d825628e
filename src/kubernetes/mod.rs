// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery, server version lookup and the Application directory.

pub mod crd;
pub mod directory;
pub mod version;

pub use crd::ensure_application_crd;
pub use directory::KubeApplicationDirectory;
pub use version::discover_server_version;
