//! # Namespaced (modern) API group
//!
//! The `opensearch.m.upbound.io/v1beta1` generation of the ProviderConfig
//! family. Modern managed resources reference one of two kinds: the
//! namespaced `ProviderConfig`, whose credentials must live alongside the
//! referencing resource, or the cluster-scoped `ClusterProviderConfig`.
//!
//! [`ProviderConfigSpec`] doubles as the canonical, scope-agnostic spec
//! returned by provider-config resolution: the legacy cluster spec converts
//! into it losslessly.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{
    ProviderCredentials, ProviderConfigStatus, TypedReference, TypedResourceRef,
};

/// Namespace-scoped configuration for connecting to an OpenSearch cluster.
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "opensearch.m.upbound.io",
    version = "v1beta1",
    kind = "ProviderConfig",
    namespaced,
    status = "ProviderConfigStatus",
    shortname = "pc",
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#,
    printcolumn = r#"{"name":"Secret-Name", "type":"string", "jsonPath":".spec.credentials.secretRef.name", "priority":1}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigSpec {
    /// Credentials used to authenticate against the OpenSearch cluster.
    pub credentials: ProviderCredentials,
}

/// Cluster-scoped variant of the modern ProviderConfig, for configs shared
/// across namespaces.
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "opensearch.m.upbound.io",
    version = "v1beta1",
    kind = "ClusterProviderConfig",
    status = "ProviderConfigStatus",
    shortname = "cpc",
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#,
    printcolumn = r#"{"name":"Secret-Name", "type":"string", "jsonPath":".spec.credentials.secretRef.name", "priority":1}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProviderConfigSpec {
    /// Credentials used to authenticate against the OpenSearch cluster.
    pub credentials: ProviderCredentials,
}

/// Records that a managed resource is using a modern config object. Lives in
/// the namespace of the managed resource.
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "opensearch.m.upbound.io",
    version = "v1beta1",
    kind = "ProviderConfigUsage",
    namespaced,
    shortname = "pcu",
    printcolumn = r#"{"name":"Config-Kind", "type":"string", "jsonPath":".spec.providerConfigRef.kind"}"#,
    printcolumn = r#"{"name":"Config-Name", "type":"string", "jsonPath":".spec.providerConfigRef.name"}"#,
    printcolumn = r#"{"name":"Resource-Name", "type":"string", "jsonPath":".spec.resourceRef.name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigUsageSpec {
    /// The config object being used, identified by kind and name.
    pub provider_config_ref: TypedReference,
    /// The managed resource using it.
    pub resource_ref: TypedResourceRef,
}

impl From<ClusterProviderConfigSpec> for ProviderConfigSpec {
    fn from(spec: ClusterProviderConfigSpec) -> Self {
        Self { credentials: spec.credentials }
    }
}
