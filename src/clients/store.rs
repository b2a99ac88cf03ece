//! # ProviderConfig store
//!
//! Read access to the stored ProviderConfig kinds and write access for usage
//! records, abstracted behind a trait so resolution and tracking can be
//! exercised against an in-memory store in tests. [`KubeStore`] backs the
//! trait with the Kubernetes API server.

use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, Resource as _};
use thiserror::Error;

use crate::apis::{cluster, namespaced};

/// Field manager used for server-side-apply upserts of usage records.
pub const FIELD_MANAGER: &str = "opensearch-provider";

/// Failures talking to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object does not exist (or is not yet synced).
    #[error("{kind} {name:?} not found")]
    NotFound { kind: String, name: String },
    /// An object to be applied carries no name.
    #[error("object to apply has no name")]
    MissingObjectName,
    /// The object could not be serialized for apply.
    #[error("cannot serialize object for apply")]
    Serialize(#[from] serde_json::Error),
    /// Any other API server failure.
    #[error(transparent)]
    Api(#[from] kube::Error),
}

impl StoreError {
    fn from_get(err: kube::Error, kind: &str, name: &str) -> Self {
        match err {
            kube::Error::Api(ref resp) if resp.code == 404 => Self::NotFound {
                kind: kind.to_owned(),
                name: name.to_owned(),
            },
            other => Self::Api(other),
        }
    }
}

/// Typed reads of the ProviderConfig kinds and idempotent writes of usage
/// records. The store owns the config objects; this crate never mutates
/// their specs.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch a legacy cluster-scoped ProviderConfig by name.
    async fn legacy_provider_config(
        &self,
        name: &str,
    ) -> Result<cluster::ProviderConfig, StoreError>;

    /// Fetch a modern namespaced ProviderConfig.
    async fn modern_provider_config(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<namespaced::ProviderConfig, StoreError>;

    /// Fetch a modern cluster-scoped ClusterProviderConfig by name.
    async fn modern_cluster_provider_config(
        &self,
        name: &str,
    ) -> Result<namespaced::ClusterProviderConfig, StoreError>;

    /// Create or update a legacy usage record. Must be idempotent for the
    /// same (resource, config) pair.
    async fn apply_legacy_usage(
        &self,
        usage: cluster::ProviderConfigUsage,
    ) -> Result<(), StoreError>;

    /// Create or update a modern usage record in its namespace. Must be
    /// idempotent for the same (resource, config) pair.
    async fn apply_modern_usage(
        &self,
        usage: namespaced::ProviderConfigUsage,
    ) -> Result<(), StoreError>;
}

/// [`ConfigStore`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigStore for KubeStore {
    async fn legacy_provider_config(
        &self,
        name: &str,
    ) -> Result<cluster::ProviderConfig, StoreError> {
        let api = Api::<cluster::ProviderConfig>::all(self.client.clone());
        api.get(name)
            .await
            .map_err(|e| StoreError::from_get(e, "ProviderConfig", name))
    }

    async fn modern_provider_config(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<namespaced::ProviderConfig, StoreError> {
        let api = Api::<namespaced::ProviderConfig>::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| StoreError::from_get(e, "ProviderConfig", name))
    }

    async fn modern_cluster_provider_config(
        &self,
        name: &str,
    ) -> Result<namespaced::ClusterProviderConfig, StoreError> {
        let api = Api::<namespaced::ClusterProviderConfig>::all(self.client.clone());
        api.get(name)
            .await
            .map_err(|e| StoreError::from_get(e, "ClusterProviderConfig", name))
    }

    async fn apply_legacy_usage(
        &self,
        usage: cluster::ProviderConfigUsage,
    ) -> Result<(), StoreError> {
        let name = usage.metadata.name.clone().ok_or(StoreError::MissingObjectName)?;
        // Server-side apply needs explicit type meta, which the derived
        // resource types do not serialize.
        let patch = serde_json::json!({
            "apiVersion": cluster::ProviderConfigUsage::api_version(&()),
            "kind": cluster::ProviderConfigUsage::kind(&()),
            "metadata": serde_json::to_value(&usage.metadata)?,
            "spec": serde_json::to_value(&usage.spec)?,
        });
        let api = Api::<cluster::ProviderConfigUsage>::all(self.client.clone());
        api.patch(&name, &PatchParams::apply(FIELD_MANAGER).force(), &Patch::Apply(&patch))
            .await?;
        Ok(())
    }

    async fn apply_modern_usage(
        &self,
        usage: namespaced::ProviderConfigUsage,
    ) -> Result<(), StoreError> {
        let name = usage.metadata.name.clone().ok_or(StoreError::MissingObjectName)?;
        let namespace = usage
            .metadata
            .namespace
            .clone()
            .ok_or(StoreError::MissingObjectName)?;
        let patch = serde_json::json!({
            "apiVersion": namespaced::ProviderConfigUsage::api_version(&()),
            "kind": namespaced::ProviderConfigUsage::kind(&()),
            "metadata": serde_json::to_value(&usage.metadata)?,
            "spec": serde_json::to_value(&usage.spec)?,
        });
        let api = Api::<namespaced::ProviderConfigUsage>::namespaced(self.client.clone(), &namespace);
        api.patch(&name, &PatchParams::apply(FIELD_MANAGER).force(), &Patch::Apply(&patch))
            .await?;
        Ok(())
    }
}
