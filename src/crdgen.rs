//! # CRD Generator
//!
//! Prints the ProviderConfig-family CustomResourceDefinitions as YAML.
//!
//! ```bash
//! # Generate CRD YAML
//! cargo run --bin crdgen > package/crds/providerconfigs.yaml
//!
//! # Generate and apply directly
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use anyhow::Result;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::CustomResourceExt as _;

use opensearch_provider::apis::{cluster, namespaced};

fn main() -> Result<()> {
    let crds: [CustomResourceDefinition; 5] = [
        cluster::ProviderConfig::crd(),
        cluster::ProviderConfigUsage::crd(),
        namespaced::ProviderConfig::crd(),
        namespaced::ClusterProviderConfig::crd(),
        namespaced::ProviderConfigUsage::crd(),
    ];

    println!("# This file is auto-generated by crdgen");
    println!("# DO NOT EDIT THIS FILE MANUALLY");
    println!("# Fix malformed schemas in the Rust types under src/apis/ instead");
    for crd in &crds {
        println!("---");
        print!("{}", serde_yaml::to_string(crd)?);
    }
    Ok(())
}
