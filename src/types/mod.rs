// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Application resource model, identity and local state.

pub mod application;
pub mod identity;
pub mod state;

pub use application::{Application, ApplicationSpec, ApplicationStatus, RemoteState};
pub use identity::Identity;
pub use state::{ApplicationMetadata, ApplicationState};
