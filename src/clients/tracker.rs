//! # Usage tracking
//!
//! Records that a managed resource depends on a ProviderConfig so the config
//! cannot be deleted while in use. One tracker per resource generation. A
//! usage record is named after the owning resource's UID and carries a
//! controller owner reference, so re-tracking the same pair upserts the same
//! object and garbage collection removes it with the resource.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

use crate::apis::common::{Reference, TypedReference, TypedResourceRef};
use crate::apis::managed::Managed;
use crate::apis::{cluster, namespaced};

use super::resolver::ConfigKind;
use super::store::{ConfigStore, StoreError};

/// Label naming the config a usage record points at, for `kubectl` listing.
pub const CONFIG_LABEL: &str = "opensearch.upbound.io/providerconfig";

fn owner_reference(mg: &dyn Managed) -> OwnerReference {
    OwnerReference {
        api_version: mg.api_version().to_owned(),
        kind: mg.kind().to_owned(),
        name: mg.name().to_owned(),
        uid: mg.uid().to_owned(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

fn resource_ref(mg: &dyn Managed) -> TypedResourceRef {
    TypedResourceRef {
        api_version: mg.api_version().to_owned(),
        kind: mg.kind().to_owned(),
        name: mg.name().to_owned(),
        namespace: mg.namespace().map(str::to_owned),
    }
}

/// Tracks usage of legacy cluster-scoped ProviderConfigs.
#[derive(Debug)]
pub struct LegacyUsageTracker<'a, S: ConfigStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConfigStore + ?Sized> LegacyUsageTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upsert the usage record for `mg` using the named config. Safe to call
    /// repeatedly for the same pair.
    pub async fn track(&self, mg: &dyn Managed, config_name: &str) -> Result<(), StoreError> {
        let spec = cluster::ProviderConfigUsageSpec {
            provider_config_ref: Reference { name: config_name.to_owned() },
            resource_ref: resource_ref(mg),
        };
        let mut usage = cluster::ProviderConfigUsage::new(mg.uid(), spec);
        usage.metadata.owner_references = Some(vec![owner_reference(mg)]);
        usage.metadata.labels = Some(BTreeMap::from([(
            CONFIG_LABEL.to_owned(),
            config_name.to_owned(),
        )]));
        self.store.apply_legacy_usage(usage).await
    }
}

/// Tracks usage of modern configs, keyed on the concrete resolved kind.
#[derive(Debug)]
pub struct ModernUsageTracker<'a, S: ConfigStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConfigStore + ?Sized> ModernUsageTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upsert the usage record for `mg` in its own namespace, referencing
    /// the resolved config kind and name. Safe to call repeatedly for the
    /// same pair.
    pub async fn track(
        &self,
        mg: &dyn Managed,
        kind: ConfigKind,
        config_name: &str,
    ) -> Result<(), StoreError> {
        let spec = namespaced::ProviderConfigUsageSpec {
            provider_config_ref: TypedReference {
                kind: kind.as_str().to_owned(),
                name: config_name.to_owned(),
            },
            resource_ref: resource_ref(mg),
        };
        let mut usage = namespaced::ProviderConfigUsage::new(mg.uid(), spec);
        usage.metadata.namespace = mg.namespace().map(str::to_owned);
        usage.metadata.owner_references = Some(vec![owner_reference(mg)]);
        usage.metadata.labels = Some(BTreeMap::from([(
            CONFIG_LABEL.to_owned(),
            config_name.to_owned(),
        )]));
        self.store.apply_modern_usage(usage).await
    }
}
