//! # Credential extraction
//!
//! Turns a [`ProviderCredentials`] descriptor into raw credential bytes.
//! Extraction is idempotent and side-effect-free; the selector fully
//! determines the source. [`KubeCredentialExtractor`] is the production
//! implementation reading Kubernetes secrets, environment variables, and
//! the pod filesystem.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;
use kube::Client;
use thiserror::Error;

use crate::apis::common::{CredentialSource, ProviderCredentials};

/// Failures extracting credential bytes.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Source is `Secret` but no secret selector was configured.
    #[error("no secretRef configured for Secret credentials source")]
    MissingSecretRef,
    /// The secret selector carries no namespace to read from.
    #[error("secretRef for secret {name:?} is missing a namespace")]
    MissingSecretNamespace { name: String },
    /// The referenced secret has no such data key.
    #[error("secret {name:?} has no data key {key:?}")]
    MissingSecretKey { name: String, key: String },
    /// Source is `Environment` but no environment selector was configured.
    #[error("no env selector configured for Environment credentials source")]
    MissingEnvSelector,
    /// The environment variable could not be read.
    #[error("cannot read environment variable {name:?}")]
    Env {
        name: String,
        #[source]
        source: std::env::VarError,
    },
    /// Source is `Filesystem` but no filesystem selector was configured.
    #[error("no fs selector configured for Filesystem credentials source")]
    MissingFsSelector,
    /// The credentials file could not be read.
    #[error("cannot read credentials file {path:?}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The API server call to fetch the secret failed.
    #[error(transparent)]
    Api(#[from] kube::Error),
}

/// Extracts raw credential bytes for a credential descriptor.
#[async_trait]
pub trait CredentialExtractor: Send + Sync {
    async fn extract(&self, credentials: &ProviderCredentials) -> Result<Vec<u8>, ExtractError>;
}

/// Production extractor. Secret reads go through the API server; environment
/// and filesystem reads are local to the provider pod.
#[derive(Clone)]
pub struct KubeCredentialExtractor {
    client: Client,
}

impl std::fmt::Debug for KubeCredentialExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeCredentialExtractor").finish_non_exhaustive()
    }
}

impl KubeCredentialExtractor {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn from_secret(&self, credentials: &ProviderCredentials) -> Result<Vec<u8>, ExtractError> {
        let selector = credentials
            .secret_ref
            .as_ref()
            .ok_or(ExtractError::MissingSecretRef)?;
        let namespace = selector.namespace.as_deref().ok_or_else(|| {
            ExtractError::MissingSecretNamespace { name: selector.name.clone() }
        })?;
        let api = Api::<Secret>::namespaced(self.client.clone(), namespace);
        let secret = api.get(&selector.name).await?;
        secret
            .data
            .as_ref()
            .and_then(|data| data.get(&selector.key))
            .map(|bytes| bytes.0.clone())
            .ok_or_else(|| ExtractError::MissingSecretKey {
                name: selector.name.clone(),
                key: selector.key.clone(),
            })
    }
}

#[async_trait]
impl CredentialExtractor for KubeCredentialExtractor {
    async fn extract(&self, credentials: &ProviderCredentials) -> Result<Vec<u8>, ExtractError> {
        match credentials.source {
            CredentialSource::Secret => self.from_secret(credentials).await,
            _ => extract_local(credentials).await,
        }
    }
}

/// Extraction for the sources local to the provider pod. Secret handling
/// needs the API server and lives on [`KubeCredentialExtractor`].
async fn extract_local(credentials: &ProviderCredentials) -> Result<Vec<u8>, ExtractError> {
    match credentials.source {
        CredentialSource::Environment => {
            let selector = credentials.env.as_ref().ok_or(ExtractError::MissingEnvSelector)?;
            std::env::var(&selector.name)
                .map(String::into_bytes)
                .map_err(|source| ExtractError::Env { name: selector.name.clone(), source })
        }
        CredentialSource::Filesystem => {
            let selector = credentials.fs.as_ref().ok_or(ExtractError::MissingFsSelector)?;
            tokio::fs::read(&selector.path)
                .await
                .map_err(|source| ExtractError::Io { path: selector.path.clone(), source })
        }
        // Nothing to extract; the wrapped provider authenticates through
        // ambient identity, or not at all.
        CredentialSource::None | CredentialSource::InjectedIdentity | CredentialSource::Secret => {
            Ok(Vec::new())
        }
    }
}
