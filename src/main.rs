// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use harbormaster::argocd::ServerInterface;
use harbormaster::config::Config;
use harbormaster::lifecycle::ApplicationController;
use harbormaster::types::ApplicationState;

#[derive(Parser)]
#[command(name = "harbormaster", about = "Manage the lifecycle of ArgoCD Applications", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the Application described by a state file and record its id
    Create {
        /// YAML state file, rewritten in place
        state: PathBuf,
    },

    /// Refresh a state file from the cluster
    Read { state: PathBuf },

    /// Apply the differences between a prior and a desired state file
    Update {
        /// Desired state, rewritten in place with the refreshed result
        state: PathBuf,

        /// State as of the last successful operation
        #[arg(long)]
        prior: PathBuf,
    },

    /// Delete the Application and wait for it to disappear
    Delete { state: PathBuf },

    /// Write a state file for an existing Application
    Import {
        /// Application id in the form <name>:<namespace>
        id: String,

        #[arg(long, short = 'o')]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: server_version={:?}, update_settle={:?}",
        config.server_version, config.delays.update_settle
    );

    let controller = ApplicationController::new(ServerInterface::new(config));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            on_signal.cancel();
        }
    });

    match cli.command {
        Commands::Create { state: path } => {
            let mut state = load_state(&path)?;
            let result = controller.create(&mut state, &cancel).await;
            save_state(&path, &state)?;
            result?;
        }
        Commands::Read { state: path } => {
            let mut state = load_state(&path)?;
            controller.read(&mut state, &cancel).await?;
            save_state(&path, &state)?;
        }
        Commands::Update { state: path, prior } => {
            let prior = load_state(&prior)?;
            let mut state = load_state(&path)?;
            if state.id.is_none() {
                state.id = prior.id.clone();
            }
            let result = controller.update(&prior, &mut state, &cancel).await;
            save_state(&path, &state)?;
            result?;
        }
        Commands::Delete { state: path } => {
            let mut state = load_state(&path)?;
            let result = controller.delete(&mut state, &cancel).await;
            // The id is gone once the delete was accepted, even if confirmation failed
            save_state(&path, &state)?;
            result?;
        }
        Commands::Import { id, output } => {
            let state = controller.import(&id, &cancel).await?;
            save_state(&output, &state)?;
        }
    }

    Ok(())
}

fn load_state(path: &Path) -> Result<ApplicationState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read state file {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("invalid state file {}", path.display()))
}

fn save_state(path: &Path, state: &ApplicationState) -> Result<()> {
    let raw = serde_yaml::to_string(state)?;
    fs::write(path, raw).with_context(|| format!("failed to write state file {}", path.display()))
}
