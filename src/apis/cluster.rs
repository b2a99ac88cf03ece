//! # Cluster-scoped (legacy) API group
//!
//! The `opensearch.upbound.io/v1beta1` generation of the ProviderConfig
//! family. Legacy managed resources reference these configs by name only;
//! both kinds here are cluster-scoped.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{ProviderCredentials, ProviderConfigStatus, Reference, TypedResourceRef};

/// Configuration for connecting to an OpenSearch cluster, shared by many
/// managed resources.
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "opensearch.upbound.io",
    version = "v1beta1",
    kind = "ProviderConfig",
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

/// Records that a managed resource is using a [`ProviderConfig`], blocking
/// its deletion while in use. Created by the usage tracker, garbage-collected
/// with the owning managed resource.
#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "opensearch.upbound.io",
    version = "v1beta1",
    kind = "ProviderConfigUsage",
    shortname = "pcu",
    printcolumn = r#"{"name":"Config-Name", "type":"string", "jsonPath":".spec.providerConfigRef.name"}"#,
    printcolumn = r#"{"name":"Resource-Kind", "type":"string", "jsonPath":".spec.resourceRef.kind"}"#,
    printcolumn = r#"{"name":"Resource-Name", "type":"string", "jsonPath":".spec.resourceRef.name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigUsageSpec {
    /// The ProviderConfig being used.
    pub provider_config_ref: Reference,
    /// The managed resource using it.
    pub resource_ref: TypedResourceRef,
}
