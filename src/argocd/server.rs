// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Lazily initialised handles to the ArgoCD server.

use std::sync::Arc;

use kube::Client;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::argocd::directory::ApplicationDirectory;
use crate::argocd::features::{FeatureOracle, VersionFeatures};
use crate::config::Config;
use crate::error::Result;
use crate::kubernetes::{discover_server_version, ensure_application_crd, KubeApplicationDirectory};

/// Directory and feature oracle for one lifecycle operation
#[derive(Clone)]
pub struct Clients {
    pub directory: Arc<dyn ApplicationDirectory>,
    pub features: Arc<dyn FeatureOracle>,
}

pub struct ServerInterface {
    config: Config,
    clients: OnceCell<Clients>,
}

impl ServerInterface {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clients: OnceCell::new(),
        }
    }

    /// Use ready-made clients instead of connecting to a cluster
    pub fn with_clients(
        config: Config,
        directory: Arc<dyn ApplicationDirectory>,
        features: Arc<dyn FeatureOracle>,
    ) -> Self {
        Self {
            config,
            clients: OnceCell::new_with(Some(Clients {
                directory,
                features,
            })),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connect on first use; later calls reuse the same clients
    pub async fn init_clients(&self) -> Result<Clients> {
        let clients = self
            .clients
            .get_or_try_init(|| async {
                let client = Client::try_default().await?;
                info!("Connected to Kubernetes cluster");
                self.connect(client).await
            })
            .await?;

        Ok(clients.clone())
    }

    /// Verify the cluster serves Applications and gate features on the server version.
    /// A configured version overrides the one discovered in the cluster.
    async fn connect(&self, client: Client) -> Result<Clients> {
        ensure_application_crd(&client).await?;

        let version = match self.config.server_version {
            Some(v) => {
                info!("Using configured ArgoCD server version {}", v);
                Some(v)
            }
            None => discover_server_version(&client).await,
        };

        match version {
            Some(v) => info!("Gating features for ArgoCD {}", v),
            None => warn!("ArgoCD server version unknown, assuming all features"),
        }

        Ok(Clients {
            directory: Arc::new(KubeApplicationDirectory::new(client)),
            features: Arc::new(VersionFeatures::new(version)),
        })
    }
}
