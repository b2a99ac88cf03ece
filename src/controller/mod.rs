//! # Controller wiring
//!
//! Registration surface for the generated per-resource controllers: each one
//! receives the Kubernetes client and the provider-setup hook. Also hosts
//! the ProviderConfig watch loop the provider binary runs for visibility
//! into config object churn.

use anyhow::Result;
use futures::future::BoxFuture;
use futures::TryStreamExt as _;
use kube::api::Api;
use kube::Client;
use kube_runtime::{watcher, WatchStreamExt as _};
use std::sync::Arc;
use tracing::{debug, info};

use crate::apis::{cluster, namespaced};
use crate::clients::SetupFn;

/// A controller entry point: given the client and the setup hook, runs until
/// the process shuts down or fails.
pub type ControllerFn = Box<dyn FnOnce(Client, SetupFn) -> BoxFuture<'static, Result<()>> + Send>;

/// Collects the controllers to run. Generated code registers one entry per
/// managed resource kind; the provider binary then starts them all against a
/// shared client and setup hook.
#[derive(Default)]
pub struct Registry {
    entries: Vec<(String, ControllerFn)>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("controllers", &self.entries.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller under a stable name.
    pub fn register(&mut self, name: impl Into<String>, controller: ControllerFn) {
        self.entries.push((name.into(), controller));
    }

    /// Names of the registered controllers, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Start every registered controller; the first to fail aborts the rest.
    pub async fn run(self, client: Client, setup: SetupFn) -> Result<()> {
        let futures: Vec<_> = self
            .entries
            .into_iter()
            .map(|(name, controller)| {
                info!(controller = %name, "starting controller");
                controller(client.clone(), Arc::clone(&setup))
            })
            .collect();
        futures::future::try_join_all(futures).await?;
        Ok(())
    }
}

/// Watch both cluster-scoped ProviderConfig kinds and log their lifecycle.
/// Resolution reads configs on demand; this loop only provides operator
/// visibility.
pub async fn watch_provider_configs(client: Client) -> Result<()> {
    let legacy = Api::<cluster::ProviderConfig>::all(client.clone());
    let modern = Api::<namespaced::ClusterProviderConfig>::all(client);

    let legacy_watch = async move {
        let mut stream =
            std::pin::pin!(watcher(legacy, watcher::Config::default()).default_backoff());
        while let Some(event) = stream.try_next().await? {
            match event {
                watcher::Event::Apply(pc) => {
                    info!(
                        name = pc.metadata.name.as_deref().unwrap_or("unknown"),
                        "provider config applied"
                    );
                }
                watcher::Event::Delete(pc) => {
                    info!(
                        name = pc.metadata.name.as_deref().unwrap_or("unknown"),
                        "provider config deleted"
                    );
                }
                _ => debug!("provider config watch resync"),
            }
        }
        Ok::<(), anyhow::Error>(())
    };

    let modern_watch = async move {
        let mut stream =
            std::pin::pin!(watcher(modern, watcher::Config::default()).default_backoff());
        while let Some(event) = stream.try_next().await? {
            match event {
                watcher::Event::Apply(pc) => {
                    info!(
                        name = pc.metadata.name.as_deref().unwrap_or("unknown"),
                        "cluster provider config applied"
                    );
                }
                watcher::Event::Delete(pc) => {
                    info!(
                        name = pc.metadata.name.as_deref().unwrap_or("unknown"),
                        "cluster provider config deleted"
                    );
                }
                _ => debug!("cluster provider config watch resync"),
            }
        }
        Ok::<(), anyhow::Error>(())
    };

    futures::try_join!(legacy_watch, modern_watch)?;
    Ok(())
}
