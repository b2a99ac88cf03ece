//! # Shared API types
//!
//! Credential descriptors, references, and status types shared by the
//! cluster-scoped and namespaced ProviderConfig API groups. The two groups
//! must stay structurally identical for every field defined on both, so the
//! payload types live here and the kind definitions only wrap them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where provider credentials come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum CredentialSource {
    /// No credentials required.
    #[default]
    None,
    /// Credentials are stored in a Kubernetes secret.
    Secret,
    /// Credentials are in an environment variable of the provider pod.
    Environment,
    /// Credentials are in a file on the provider pod's filesystem.
    Filesystem,
    /// Credentials are injected into the pod by an external identity system.
    InjectedIdentity,
}

/// A reference to a specific key of a Kubernetes secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    /// Name of the secret.
    pub name: String,
    /// Namespace of the secret. Cluster-scoped configs must set this;
    /// namespaced configs have it overridden with the namespace of the
    /// managed resource being reconciled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// The key within the secret's data whose value holds the credentials.
    pub key: String,
}

/// A path on the provider pod's filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FsSelector {
    /// Filesystem path to read credentials from.
    pub path: String,
}

/// An environment variable of the provider pod.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvSelector {
    /// Name of the environment variable holding the credentials.
    pub name: String,
}

/// Credential descriptor of a ProviderConfig: the source kind plus the
/// selector matching that source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentials {
    /// Source of the provider credentials.
    #[serde(default)]
    pub source: CredentialSource,
    /// Secret selector, used when source is `Secret`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretKeySelector>,
    /// Filesystem selector, used when source is `Filesystem`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsSelector>,
    /// Environment selector, used when source is `Environment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvSelector>,
}

/// A name-only reference to a cluster-scoped ProviderConfig (legacy shape).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Name of the referenced ProviderConfig.
    pub name: String,
}

/// A kinded reference to a ProviderConfig (modern shape). The namespace is
/// implicit: it is always the namespace of the referencing managed resource,
/// and is ignored when the referenced kind is cluster-scoped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypedReference {
    /// Kind of the referenced config object, `ProviderConfig` or
    /// `ClusterProviderConfig`.
    pub kind: String,
    /// Name of the referenced config object.
    pub name: String,
}

/// A fully qualified reference to the managed resource owning a usage record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypedResourceRef {
    /// API version of the managed resource.
    pub api_version: String,
    /// Kind of the managed resource.
    pub kind: String,
    /// Name of the managed resource.
    pub name: String,
    /// Namespace of the managed resource, absent for cluster-scoped kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Observed condition of a ProviderConfig.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub r#type: String,
    pub status: String,
    #[serde(default)]
    pub last_transition_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Status shared by all ProviderConfig kinds.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Number of managed resources currently using this config, maintained
    /// from the usage records.
    #[serde(default)]
    pub users: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_source_defaults_to_none() {
        let creds: ProviderCredentials = serde_json::from_str("{}").expect("empty object");
        assert_eq!(creds.source, CredentialSource::None);
        assert!(creds.secret_ref.is_none());
    }

    #[test]
    fn credentials_round_trip_camel_case() {
        let json = serde_json::json!({
            "source": "Secret",
            "secretRef": {"name": "creds", "namespace": "crossplane-system", "key": "config"}
        });
        let creds: ProviderCredentials =
            serde_json::from_value(json.clone()).expect("valid credentials");
        assert_eq!(creds.source, CredentialSource::Secret);
        let sel = creds.secret_ref.as_ref().expect("secret ref present");
        assert_eq!(sel.namespace.as_deref(), Some("crossplane-system"));
        assert_eq!(serde_json::to_value(&creds).expect("serializable"), json);
    }

    #[test]
    fn unset_selectors_are_omitted_from_output() {
        let creds = ProviderCredentials {
            source: CredentialSource::Environment,
            env: Some(EnvSelector { name: "OPENSEARCH_CREDS".to_owned() }),
            ..ProviderCredentials::default()
        };
        let value = serde_json::to_value(&creds).expect("serializable");
        assert!(value.get("secretRef").is_none());
        assert!(value.get("fs").is_none());
        assert_eq!(value["env"]["name"], "OPENSEARCH_CREDS");
    }
}
