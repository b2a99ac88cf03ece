//! # OpenSearch Provider
//!
//! A Crossplane-style Kubernetes provider runtime for OpenSearch. The
//! generated per-resource reconcilers delegate CRUD to a wrapped Terraform
//! provider; this crate supplies the runtime they share:
//!
//! - the ProviderConfig family of custom resources in both supported
//!   generations (cluster-scoped legacy, namespaced modern),
//! - provider-config resolution from a managed resource to one canonical
//!   spec, with usage tracking so in-use configs cannot be deleted,
//! - credential extraction and the assembly of the wrapped provider's
//!   configuration map, with an exactly-once, cancellation-detached
//!   configure call per reconciliation.

pub mod apis;
pub mod clients;
pub mod controller;

pub use clients::terraform::{Configuration, ProviderMeta, Setup, TerraformProvider};
pub use clients::{SetupBuilder, SetupError, SetupFn};
