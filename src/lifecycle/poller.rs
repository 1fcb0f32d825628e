// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Delete confirmation by polling the directory until the Application is gone.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use crate::argocd::directory::{ApplicationDirectory, DirectoryError};
use crate::config::DelayPolicy;
use crate::error::{HarbormasterError, Result};
use crate::lifecycle::api_error;
use crate::types::Identity;

#[derive(Debug)]
enum PollState {
    /// Still listed, poll again
    Pending,
    Confirmed,
    /// The directory failed in a way retrying will not fix
    Failed(DirectoryError),
}

pub struct ConvergencePoller<'a> {
    directory: &'a dyn ApplicationDirectory,
    identity: &'a Identity,
    delays: &'a DelayPolicy,
}

impl<'a> ConvergencePoller<'a> {
    pub fn new(
        directory: &'a dyn ApplicationDirectory,
        identity: &'a Identity,
        delays: &'a DelayPolicy,
    ) -> Self {
        Self {
            directory,
            identity,
            delays,
        }
    }

    /// Poll until the identity no longer lists. Returns the number of polls taken.
    #[instrument(skip(self), fields(application = %self.identity))]
    pub async fn wait_until_absent(&self) -> Result<u32> {
        let deadline = self.delays.convergence_timeout;

        match timeout(deadline, self.run()).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Application {} still present after {:?}", self.identity, deadline);
                Err(HarbormasterError::ConvergenceTimeout {
                    name: self.identity.name.clone(),
                    namespace: self.identity.namespace.clone(),
                    timeout: deadline,
                })
            }
        }
    }

    async fn run(&self) -> Result<u32> {
        let mut interval = self.delays.poll_interval;
        let mut polls = 0;

        loop {
            polls += 1;

            match self.poll().await {
                PollState::Confirmed => {
                    info!("Deletion of {} confirmed after {} polls", self.identity, polls);
                    return Ok(polls);
                }
                PollState::Failed(e) => return Err(api_error("delete", &self.identity.name, e)),
                PollState::Pending => {
                    debug!("Application {} is still present, retrying in {:?}", self.identity, interval);
                }
            }

            sleep(interval).await;

            // Exponential backoff with max cap
            interval = next_interval(interval, self.delays.poll_max_interval);
        }
    }

    async fn poll(&self) -> PollState {
        match self.directory.list(self.identity).await {
            Ok(apps) if apps.is_empty() => PollState::Confirmed,
            Ok(_) => PollState::Pending,
            Err(DirectoryError::NotFound(_)) => PollState::Confirmed,
            Err(e) => PollState::Failed(e),
        }
    }
}

fn next_interval(interval: Duration, max: Duration) -> Duration {
    (interval * 2).min(max)
}
