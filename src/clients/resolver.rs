//! # Provider-config resolution
//!
//! Resolves the ProviderConfig governing a managed resource into the
//! canonical, scope-agnostic spec, across both axes of variation: legacy vs.
//! modern resource generations, and cluster- vs. namespace-scoped config
//! kinds. Registers usage on the way through so an in-use config cannot be
//! deleted.

use std::str::FromStr;

use crate::apis::common::Reference;
use crate::apis::managed::{Managed, ProviderConfigAccess};
use crate::apis::{cluster, namespaced};

use super::store::ConfigStore;
use super::tracker::{LegacyUsageTracker, ModernUsageTracker};
use super::SetupError;

/// The closed set of modern config kinds a typed reference may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    /// Namespace-scoped `ProviderConfig`.
    ProviderConfig,
    /// Cluster-scoped `ClusterProviderConfig`.
    ClusterProviderConfig,
}

impl ConfigKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProviderConfig => "ProviderConfig",
            Self::ClusterProviderConfig => "ClusterProviderConfig",
        }
    }
}

impl FromStr for ConfigKind {
    type Err = SetupError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "ProviderConfig" => Ok(Self::ProviderConfig),
            "ClusterProviderConfig" => Ok(Self::ClusterProviderConfig),
            other => Err(SetupError::UnknownConfigKind { kind: other.to_owned() }),
        }
    }
}

/// Convert a legacy cluster-scoped spec to the canonical shape via a
/// JSON-equivalent round trip. Lossless for every field defined on both
/// generations.
pub fn to_shared_spec(
    spec: &cluster::ProviderConfigSpec,
) -> Result<namespaced::ProviderConfigSpec, SetupError> {
    let value = serde_json::to_value(spec).map_err(SetupError::SpecConversion)?;
    serde_json::from_value(value).map_err(SetupError::SpecConversion)
}

/// Inverse of [`to_shared_spec`].
pub fn to_cluster_spec(
    spec: &namespaced::ProviderConfigSpec,
) -> Result<cluster::ProviderConfigSpec, SetupError> {
    let value = serde_json::to_value(spec).map_err(SetupError::SpecConversion)?;
    serde_json::from_value(value).map_err(SetupError::SpecConversion)
}

/// Resolve the ProviderConfig governing `mg` to the canonical spec,
/// registering usage through the tracker matching the resource generation.
///
/// # Errors
///
/// [`SetupError::ReferenceMissing`] when the reference field is unset (user
/// input defect), [`SetupError::ConfigNotFound`] when the referenced object
/// does not exist yet (retryable), [`SetupError::UnknownConfigKind`] /
/// [`SetupError::UnsupportedResourceKind`] for generation defects, and
/// [`SetupError::UsageTrackingFailed`] for transient store failures.
pub async fn resolve_provider_config<S: ConfigStore + ?Sized>(
    store: &S,
    mg: &dyn Managed,
) -> Result<namespaced::ProviderConfigSpec, SetupError> {
    let access = mg
        .provider_config()
        .ok_or_else(|| SetupError::UnsupportedResourceKind { kind: mg.kind().to_owned() })?;
    match access {
        ProviderConfigAccess::Legacy(reference) => {
            let reference = reference.ok_or(SetupError::ReferenceMissing)?;
            resolve_legacy(store, mg, reference).await
        }
        ProviderConfigAccess::Modern(reference) => {
            let reference = reference.ok_or(SetupError::ReferenceMissing)?;
            let kind = ConfigKind::from_str(&reference.kind)?;
            resolve_modern(store, mg, kind, &reference.name).await
        }
    }
}

async fn resolve_legacy<S: ConfigStore + ?Sized>(
    store: &S,
    mg: &dyn Managed,
    reference: &Reference,
) -> Result<namespaced::ProviderConfigSpec, SetupError> {
    let pc = store
        .legacy_provider_config(&reference.name)
        .await
        .map_err(|source| SetupError::ConfigNotFound { name: reference.name.clone(), source })?;
    let spec = to_shared_spec(&pc.spec)?;
    LegacyUsageTracker::new(store)
        .track(mg, &reference.name)
        .await
        .map_err(SetupError::UsageTrackingFailed)?;
    Ok(spec)
}

async fn resolve_modern<S: ConfigStore + ?Sized>(
    store: &S,
    mg: &dyn Managed,
    kind: ConfigKind,
    name: &str,
) -> Result<namespaced::ProviderConfigSpec, SetupError> {
    let spec = match kind {
        ConfigKind::ProviderConfig => {
            // The config must live alongside the resource referencing it.
            let namespace = mg.namespace().unwrap_or_default();
            let pc = store
                .modern_provider_config(name, namespace)
                .await
                .map_err(|source| SetupError::ConfigNotFound { name: name.to_owned(), source })?;
            let mut spec = pc.spec;
            // Namespace-scoped secrets must live alongside the resource that
            // references them; this is a security boundary. Whatever the
            // config object claims, the secret is read from the resource's
            // own namespace.
            if let Some(secret_ref) = spec.credentials.secret_ref.as_mut() {
                secret_ref.namespace = Some(namespace.to_owned());
            }
            spec
        }
        ConfigKind::ClusterProviderConfig => {
            let pc = store
                .modern_cluster_provider_config(name)
                .await
                .map_err(|source| SetupError::ConfigNotFound { name: name.to_owned(), source })?;
            pc.spec.into()
        }
    };
    ModernUsageTracker::new(store)
        .track(mg, kind, name)
        .await
        .map_err(SetupError::UsageTrackingFailed)?;
    Ok(spec)
}
