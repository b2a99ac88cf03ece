//! In-memory fakes shared by the integration tests: a config store with a
//! read-call counter, a credential extractor routed by secret name, a
//! configurable fake Terraform provider, and a managed resource stub
//! covering the legacy, modern, and unsupported shapes.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use opensearch_provider::apis::common::{
    CredentialSource, ProviderCredentials, Reference, SecretKeySelector, TypedReference,
};
use opensearch_provider::apis::managed::{Managed, ProviderConfigAccess};
use opensearch_provider::apis::{cluster, namespaced};
use opensearch_provider::clients::credentials::{CredentialExtractor, ExtractError};
use opensearch_provider::clients::store::{ConfigStore, StoreError};
use opensearch_provider::clients::terraform::{Configuration, ProviderMeta, TerraformProvider};

/// Credentials sourced from a secret, the common case in these tests.
pub fn secret_credentials(name: &str, namespace: Option<&str>, key: &str) -> ProviderCredentials {
    ProviderCredentials {
        source: CredentialSource::Secret,
        secret_ref: Some(SecretKeySelector {
            name: name.to_owned(),
            namespace: namespace.map(str::to_owned),
            key: key.to_owned(),
        }),
        ..ProviderCredentials::default()
    }
}

#[derive(Debug, Default)]
pub struct FakeStore {
    pub legacy: Mutex<BTreeMap<String, cluster::ProviderConfig>>,
    pub modern: Mutex<BTreeMap<(String, String), namespaced::ProviderConfig>>,
    pub modern_cluster: Mutex<BTreeMap<String, namespaced::ClusterProviderConfig>>,
    pub legacy_usages: Mutex<BTreeMap<String, cluster::ProviderConfigUsage>>,
    pub modern_usages: Mutex<BTreeMap<String, namespaced::ProviderConfigUsage>>,
    /// Number of config reads served, for "no store calls" assertions.
    pub get_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_legacy_config(self, name: &str, credentials: ProviderCredentials) -> Self {
        let pc = cluster::ProviderConfig::new(name, cluster::ProviderConfigSpec { credentials });
        self.legacy.lock().expect("lock").insert(name.to_owned(), pc);
        self
    }

    pub fn with_modern_config(
        self,
        name: &str,
        namespace: &str,
        credentials: ProviderCredentials,
    ) -> Self {
        let mut pc =
            namespaced::ProviderConfig::new(name, namespaced::ProviderConfigSpec { credentials });
        pc.metadata.namespace = Some(namespace.to_owned());
        self.modern
            .lock()
            .expect("lock")
            .insert((namespace.to_owned(), name.to_owned()), pc);
        self
    }

    pub fn with_modern_cluster_config(
        self,
        name: &str,
        credentials: ProviderCredentials,
    ) -> Self {
        let pc = namespaced::ClusterProviderConfig::new(
            name,
            namespaced::ClusterProviderConfigSpec { credentials },
        );
        self.modern_cluster.lock().expect("lock").insert(name.to_owned(), pc);
        self
    }
}

#[async_trait]
impl ConfigStore for FakeStore {
    async fn legacy_provider_config(
        &self,
        name: &str,
    ) -> Result<cluster::ProviderConfig, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.legacy.lock().expect("lock").get(name).cloned().ok_or_else(|| {
            StoreError::NotFound { kind: "ProviderConfig".to_owned(), name: name.to_owned() }
        })
    }

    async fn modern_provider_config(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<namespaced::ProviderConfig, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.modern
            .lock()
            .expect("lock")
            .get(&(namespace.to_owned(), name.to_owned()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "ProviderConfig".to_owned(),
                name: name.to_owned(),
            })
    }

    async fn modern_cluster_provider_config(
        &self,
        name: &str,
    ) -> Result<namespaced::ClusterProviderConfig, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.modern_cluster.lock().expect("lock").get(name).cloned().ok_or_else(|| {
            StoreError::NotFound {
                kind: "ClusterProviderConfig".to_owned(),
                name: name.to_owned(),
            }
        })
    }

    async fn apply_legacy_usage(
        &self,
        usage: cluster::ProviderConfigUsage,
    ) -> Result<(), StoreError> {
        let name = usage.metadata.name.clone().ok_or(StoreError::MissingObjectName)?;
        self.legacy_usages.lock().expect("lock").insert(name, usage);
        Ok(())
    }

    async fn apply_modern_usage(
        &self,
        usage: namespaced::ProviderConfigUsage,
    ) -> Result<(), StoreError> {
        let name = usage.metadata.name.clone().ok_or(StoreError::MissingObjectName)?;
        self.modern_usages.lock().expect("lock").insert(name, usage);
        Ok(())
    }
}

/// Extractor routed by the secret name in the resolved credential
/// descriptor, so concurrent setups can carry distinct payloads. Records
/// every descriptor it sees.
#[derive(Debug, Default)]
pub struct FakeExtractor {
    pub payloads: BTreeMap<String, Vec<u8>>,
    pub seen: Mutex<Vec<ProviderCredentials>>,
    pub fail: bool,
}

impl FakeExtractor {
    pub fn single(payload: &[u8]) -> Self {
        Self {
            payloads: BTreeMap::from([(String::new(), payload.to_vec())]),
            ..Self::default()
        }
    }

    pub fn with_payload(mut self, secret_name: &str, payload: &[u8]) -> Self {
        self.payloads.insert(secret_name.to_owned(), payload.to_vec());
        self
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

#[async_trait]
impl CredentialExtractor for FakeExtractor {
    async fn extract(&self, credentials: &ProviderCredentials) -> Result<Vec<u8>, ExtractError> {
        self.seen.lock().expect("lock").push(credentials.clone());
        if self.fail {
            return Err(ExtractError::MissingSecretRef);
        }
        let key = credentials
            .secret_ref
            .as_ref()
            .map(|sel| sel.name.clone())
            .unwrap_or_default();
        self.payloads
            .get(&key)
            .cloned()
            .ok_or(ExtractError::MissingSecretRef)
    }
}

/// Fake wrapped Terraform provider. Cloning shares the observation state so
/// tests can watch what detached configure calls do after the caller is
/// gone.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    pub delay: Option<Duration>,
    pub fail: bool,
    pub started: Arc<AtomicBool>,
    pub completed: Arc<AtomicBool>,
    pub configured: Arc<Mutex<Vec<Configuration>>>,
}

impl FakeProvider {
    pub fn slow(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

#[async_trait]
impl TerraformProvider for FakeProvider {
    async fn configure(self, configuration: Configuration) -> anyhow::Result<ProviderMeta> {
        self.started.store(true, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            anyhow::bail!("health check timeout: no OpenSearch node available");
        }
        self.configured.lock().expect("lock").push(configuration.clone());
        self.completed.store(true, Ordering::SeqCst);
        Ok(Arc::new(configuration))
    }
}

/// The provider-config reference shape a test resource presents.
#[derive(Debug, Clone)]
pub enum Shape {
    Legacy(Option<Reference>),
    Modern(Option<TypedReference>),
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct TestResource {
    pub name: String,
    pub namespace: Option<String>,
    pub uid: String,
    pub kind: String,
    pub shape: Shape,
}

impl TestResource {
    pub fn legacy(name: &str, uid: &str, config: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            namespace: None,
            uid: uid.to_owned(),
            kind: "Index".to_owned(),
            shape: Shape::Legacy(config.map(|c| Reference { name: c.to_owned() })),
        }
    }

    pub fn modern(
        name: &str,
        namespace: &str,
        uid: &str,
        config: Option<(&str, &str)>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            namespace: Some(namespace.to_owned()),
            uid: uid.to_owned(),
            kind: "Index".to_owned(),
            shape: Shape::Modern(config.map(|(kind, name)| TypedReference {
                kind: kind.to_owned(),
                name: name.to_owned(),
            })),
        }
    }

    pub fn unsupported(name: &str, uid: &str) -> Self {
        Self {
            name: name.to_owned(),
            namespace: None,
            uid: uid.to_owned(),
            kind: "Gadget".to_owned(),
            shape: Shape::Unsupported,
        }
    }
}

impl Managed for TestResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn uid(&self) -> &str {
        &self.uid
    }

    fn api_version(&self) -> &str {
        "opensearch.upbound.io/v1alpha1"
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn provider_config(&self) -> Option<ProviderConfigAccess<'_>> {
        match &self.shape {
            Shape::Legacy(reference) => Some(ProviderConfigAccess::Legacy(reference.as_ref())),
            Shape::Modern(reference) => Some(ProviderConfigAccess::Modern(reference.as_ref())),
            Shape::Unsupported => None,
        }
    }
}
