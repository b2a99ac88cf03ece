//! # OpenSearch Provider binary
//!
//! Bootstraps the provider: installs the rustls crypto provider, initializes
//! tracing, connects to the cluster, and runs the ProviderConfig watch loop.
//! Generated per-resource controllers register themselves in the controller
//! registry and receive the shared setup hook built from `SetupBuilder`;
//! this binary only wires and starts them.

use anyhow::{Context, Result};
use kube::Client;
use tracing::info;

use opensearch_provider::controller;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider FIRST, before any other operations.
    // Required for rustls 0.23+ when no default provider is set via features.
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opensearch_provider=info".into()),
        )
        .init();

    info!("starting OpenSearch provider");

    let client = Client::try_default()
        .await
        .context("cannot create Kubernetes client")?;

    controller::watch_provider_configs(client).await
}
