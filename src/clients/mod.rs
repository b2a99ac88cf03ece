//! # OpenSearch client setup
//!
//! The bridge between generated reconcilers and the wrapped OpenSearch
//! Terraform provider: resolve the governing ProviderConfig, extract and
//! decode credentials, assemble the provider configuration map from an
//! allow-list of known settings, and run the provider's one-time
//! configuration. This module never logs and never retries; callers decide
//! retry scheduling from [`SetupError::is_retryable`].

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::apis::managed::Managed;

pub mod credentials;
pub mod resolver;
pub mod store;
pub mod terraform;
pub mod tracker;

use credentials::{CredentialExtractor, ExtractError};
use store::{ConfigStore, StoreError};
use terraform::{Configuration, Setup, TerraformProvider};

/// Settings copied from decoded credentials into the provider configuration
/// map. Keys mirror the OpenSearch Terraform provider schema; anything else
/// in the credential blob is ignored because the wrapped provider rejects
/// unrecognized keys.
pub const PROVIDER_SETTINGS: [&str; 24] = [
    // OpenSearch URL
    "url",
    // Username and password for basic auth
    "username",
    "password",
    // A bearer token or ApiKey for an Authorization header, and its type
    "token",
    "token_name",
    // Disable SSL verification of API calls
    "insecure",
    // TLS material: custom CA, client certificate and key
    "cacert_file",
    "client_cert_path",
    "client_key_path",
    // Client healthcheck and node sniffing options
    "healthcheck",
    "sniff",
    // 'Host' header / ServerName override for SSH-tunneled access
    "host_override",
    "opensearch_version",
    "version_ping_timeout",
    // Proxy URL for requests to OpenSearch
    "proxy",
    // AWS request signing for AWS OpenSearch Service domains
    "sign_aws_requests",
    "aws_access_key",
    "aws_secret_key",
    "aws_token",
    "aws_profile",
    "aws_region",
    "aws_assume_role_arn",
    "aws_assume_role_external_id",
    "aws_signature_service",
];

/// Everything that can go wrong building a [`Setup`]. The `Display` prefix
/// names the stage; [`SetupError::is_retryable`] carries the taxonomy the
/// calling reconciler schedules retries from.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The resource's provider-config reference field is unset.
    #[error("resolve: no providerConfigRef provided")]
    ReferenceMissing,
    /// The referenced config object does not exist (or is not yet synced).
    #[error("resolve: cannot get referenced provider config {name:?}")]
    ConfigNotFound {
        name: String,
        #[source]
        source: StoreError,
    },
    /// The typed reference names a kind outside the closed config kind set.
    #[error("resolve: unknown provider config kind {kind:?}")]
    UnknownConfigKind { kind: String },
    /// The resource kind exposes no provider-config reference shape.
    #[error("resolve: {kind} is not a managed resource")]
    UnsupportedResourceKind { kind: String },
    /// Converting between the two config generations failed.
    #[error("resolve: cannot convert cluster-scoped provider config spec")]
    SpecConversion(#[source] serde_json::Error),
    /// The usage record could not be written.
    #[error("track: cannot track provider config usage")]
    UsageTrackingFailed(#[source] StoreError),
    /// Raw credential bytes could not be extracted.
    #[error("extract: cannot extract credentials")]
    CredentialExtractFailed(#[source] ExtractError),
    /// The extracted bytes are not a flat JSON string map.
    #[error("decode: cannot unmarshal opensearch credentials as JSON")]
    CredentialDecode(#[source] serde_json::Error),
    /// The wrapped provider reported a configuration-level failure.
    #[error("configure: cannot configure the OpenSearch provider")]
    ProviderConfigurationFailed(#[source] anyhow::Error),
}

impl SetupError {
    /// Whether the failure is environmental/timing and worth retrying, as
    /// opposed to a user input or generation defect the retry cannot fix.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConfigNotFound { .. }
            | Self::UsageTrackingFailed(_)
            | Self::CredentialExtractFailed(_)
            | Self::ProviderConfigurationFailed(_) => true,
            Self::ReferenceMissing
            | Self::UnknownConfigKind { .. }
            | Self::UnsupportedResourceKind { .. }
            | Self::SpecConversion(_)
            | Self::CredentialDecode(_) => false,
        }
    }
}

/// The provider-setup hook handed to every generated controller.
pub type SetupFn =
    Arc<dyn Fn(Arc<dyn Managed>) -> BoxFuture<'static, Result<Setup, SetupError>> + Send + Sync>;

/// Builds per-reconciliation [`Setup`] values. Holds a prototype of the
/// wrapped provider; every call clones it so concurrent setups for different
/// resources can never observe each other's configuration.
#[derive(Debug)]
pub struct SetupBuilder<S, E, P> {
    store: Arc<S>,
    extractor: Arc<E>,
    provider: P,
}

impl<S, E, P> SetupBuilder<S, E, P>
where
    S: ConfigStore + 'static,
    E: CredentialExtractor + 'static,
    P: TerraformProvider,
{
    pub fn new(store: Arc<S>, extractor: Arc<E>, provider: P) -> Self {
        Self { store, extractor, provider }
    }

    /// Resolve, extract, decode, and configure, in that order. Steps are
    /// strictly sequential; any failure aborts before the provider is
    /// touched, so a provider value is never left half-configured.
    pub async fn build_setup(&self, mg: &dyn Managed) -> Result<Setup, SetupError> {
        let spec = resolver::resolve_provider_config(self.store.as_ref(), mg).await?;

        let data = self
            .extractor
            .extract(&spec.credentials)
            .await
            .map_err(SetupError::CredentialExtractFailed)?;
        let creds: BTreeMap<String, String> =
            serde_json::from_slice(&data).map_err(SetupError::CredentialDecode)?;

        let mut configuration = Configuration::new();
        for setting in PROVIDER_SETTINGS {
            if let Some(value) = creds.get(setting) {
                configuration.insert(setting.to_owned(), serde_json::Value::String(value.clone()));
            }
        }

        // The plugin SDK configures a provider value exactly once, so each
        // call consumes a private copy of the prototype. The configure call
        // runs on a detached task: once begun it must finish even if the
        // triggering reconciliation is cancelled, otherwise a
        // half-configured provider value could be observed.
        let provider = self.provider.clone();
        let task_configuration = configuration.clone();
        let meta = tokio::spawn(async move { provider.configure(task_configuration).await })
            .await
            .map_err(|join| SetupError::ProviderConfigurationFailed(anyhow::anyhow!(join)))?
            .map_err(SetupError::ProviderConfigurationFailed)?;

        Ok(Setup { configuration, meta })
    }

    /// Wrap this builder as the [`SetupFn`] registered with the generated
    /// controllers, capturing the wrapped provider prototype by closure.
    #[must_use]
    pub fn into_setup_fn(self: Arc<Self>) -> SetupFn {
        Arc::new(move |mg: Arc<dyn Managed>| {
            let builder = Arc::clone(&self);
            Box::pin(async move { builder.build_setup(mg.as_ref()).await })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_cover_connection_auth_tls_and_aws_signing() {
        for key in ["url", "username", "password", "cacert_file", "proxy", "aws_region"] {
            assert!(PROVIDER_SETTINGS.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn retryability_follows_the_taxonomy() {
        assert!(SetupError::UsageTrackingFailed(StoreError::MissingObjectName).is_retryable());
        assert!(!SetupError::ReferenceMissing.is_retryable());
        assert!(!SetupError::UnknownConfigKind { kind: "StoreConfig".to_owned() }.is_retryable());
        assert!(!SetupError::UnsupportedResourceKind { kind: "Gadget".to_owned() }.is_retryable());
    }

    #[test]
    fn display_names_the_failing_stage() {
        assert!(SetupError::ReferenceMissing.to_string().starts_with("resolve:"));
        assert!(SetupError::UsageTrackingFailed(StoreError::MissingObjectName)
            .to_string()
            .starts_with("track:"));
        let decode_err =
            serde_json::from_slice::<BTreeMap<String, String>>(b"not json").expect_err("bad json");
        assert!(SetupError::CredentialDecode(decode_err).to_string().starts_with("decode:"));
    }
}
