// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Application lifecycle controller - the create/read/update/delete entry points.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::argocd::directory::DirectoryError;
use crate::argocd::server::ServerInterface;
use crate::error::{HarbormasterError, Result};
use crate::lifecycle::apply::{ApplyEngine, UpdateOutcome};
use crate::lifecycle::guard::guard_create;
use crate::lifecycle::normalize::normalize_spec;
use crate::lifecycle::poller::ConvergencePoller;
use crate::lifecycle::{api_error, single_match};
use crate::types::{Application, ApplicationState, Identity};

pub struct ApplicationController {
    server: ServerInterface,
}

impl ApplicationController {
    pub fn new(server: ServerInterface) -> Self {
        Self { server }
    }

    /// Create the Application described by `state` and record its id.
    #[instrument(skip_all, fields(application = %state.desired_identity()))]
    pub async fn create(&self, state: &mut ApplicationState, cancel: &CancellationToken) -> Result<()> {
        let timeout = self.server.config().timeouts.create;
        bounded("create", timeout, cancel, self.create_inner(state)).await
    }

    /// Refresh `state` from the directory, clearing the id if the Application is gone.
    #[instrument(skip_all, fields(id = ?state.id))]
    pub async fn read(&self, state: &mut ApplicationState, cancel: &CancellationToken) -> Result<()> {
        let timeout = self.server.config().timeouts.create;
        bounded("read", timeout, cancel, self.read_inner(state)).await
    }

    /// Push changes between `prior` and `state`; unchanged state only re-reads.
    #[instrument(skip_all, fields(id = ?state.id))]
    pub async fn update(
        &self,
        prior: &ApplicationState,
        state: &mut ApplicationState,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let timeout = self.server.config().timeouts.update;
        bounded("update", timeout, cancel, self.update_inner(prior, state)).await
    }

    /// Delete the Application and wait for the directory to stop listing it.
    #[instrument(skip_all, fields(id = ?state.id))]
    pub async fn delete(&self, state: &mut ApplicationState, cancel: &CancellationToken) -> Result<()> {
        let timeout = self.server.config().timeouts.delete;
        bounded("delete", timeout, cancel, self.delete_inner(state)).await
    }

    /// Adopt an existing Application by its `name:namespace` id.
    #[instrument(skip(self, cancel))]
    pub async fn import(&self, id: &str, cancel: &CancellationToken) -> Result<ApplicationState> {
        let identity: Identity = id.parse()?;
        let mut state = ApplicationState::imported(identity);

        self.read(&mut state, cancel).await?;

        if state.id.is_none() {
            warn!("Application {} does not exist, nothing imported", id);
        }
        Ok(state)
    }

    async fn create_inner(&self, state: &mut ApplicationState) -> Result<()> {
        let clients = self.server.init_clients().await?;
        let identity = state.desired_identity();

        let mut spec = state.spec.clone();
        normalize_spec(&mut spec, clients.features.as_ref())?;

        guard_create(clients.directory.as_ref(), &identity).await?;

        let envelope = Application::envelope(state.metadata.to_object_meta(), spec);
        let id = ApplyEngine::new(clients.directory.as_ref())
            .create(&envelope)
            .await?;

        state.id = Some(id);
        Ok(())
    }

    async fn read_inner(&self, state: &mut ApplicationState) -> Result<()> {
        let clients = self.server.init_clients().await?;
        let identity = state.id.clone().ok_or(HarbormasterError::MissingIdentity)?;

        let apps = match clients.directory.list(&identity).await {
            Ok(apps) => apps,
            Err(DirectoryError::NotFound(_)) => {
                info!("Application {} not found, clearing id", identity);
                state.clear();
                return Ok(());
            }
            Err(e) => return Err(api_error("read", &identity.name, e)),
        };

        match single_match(apps, &identity)? {
            Some(app) => {
                debug!("Observed application {}", identity);
                state.observe(&app);
            }
            None => {
                info!("Application {} no longer listed, clearing id", identity);
                state.clear();
            }
        }

        Ok(())
    }

    async fn update_inner(&self, prior: &ApplicationState, state: &mut ApplicationState) -> Result<()> {
        if !state.has_changes(prior) {
            debug!("No changes to metadata or spec, reading instead");
            return self.read_inner(state).await;
        }

        let identity = state.id.clone().ok_or(HarbormasterError::MissingIdentity)?;

        // Name and namespace are fixed once created
        let desired = state.desired_identity();
        if desired != identity {
            return Err(HarbormasterError::IdentityChanged {
                current: identity.to_string(),
                desired: desired.to_string(),
            });
        }

        let clients = self.server.init_clients().await?;

        let mut spec = state.spec.clone();
        normalize_spec(&mut spec, clients.features.as_ref())?;

        let envelope = Application::envelope(state.metadata.to_object_meta(), spec);
        let settle = self.server.config().delays.update_settle;
        let outcome = ApplyEngine::new(clients.directory.as_ref())
            .update(&identity, &envelope, settle)
            .await?;

        match outcome {
            UpdateOutcome::Updated => self.read_inner(state).await,
            UpdateOutcome::Gone => {
                state.clear();
                Ok(())
            }
        }
    }

    async fn delete_inner(&self, state: &mut ApplicationState) -> Result<()> {
        let clients = self.server.init_clients().await?;
        let identity = state.id.clone().ok_or(HarbormasterError::MissingIdentity)?;

        ApplyEngine::new(clients.directory.as_ref())
            .delete(&identity, state.cascade)
            .await?;

        // The delete was accepted; never resurrect the id, whatever polling reports
        state.clear();

        let delays = &self.server.config().delays;
        ConvergencePoller::new(clients.directory.as_ref(), &identity, delays)
            .wait_until_absent()
            .await?;

        Ok(())
    }
}

/// Run `fut` until it completes, the caller cancels, or `timeout` passes
async fn bounded<T>(
    operation: &'static str,
    timeout: Duration,
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(HarbormasterError::Cancelled { operation }),
        res = tokio::time::timeout(timeout, fut) => {
            res.unwrap_or(Err(HarbormasterError::OperationTimedOut { operation, timeout }))
        }
    }
}
