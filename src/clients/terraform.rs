//! # Wrapped Terraform provider seam
//!
//! The vendored OpenSearch Terraform provider is an external collaborator;
//! this module defines the narrow surface the setup path needs from it: a
//! one-shot `configure` that consumes an assembled configuration map and
//! yields an opaque client/metadata handle.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

/// The configuration map handed to the wrapped provider. String keys from
/// the provider's schema, heterogeneous scalar values.
pub type Configuration = BTreeMap<String, serde_json::Value>;

/// Opaque client metadata produced by the wrapped provider's configuration
/// call. Consumed only by the generated per-resource reconcilers.
pub type ProviderMeta = Arc<dyn Any + Send + Sync>;

/// The per-reconciliation setup bundle: the assembled configuration map plus
/// the metadata handle the configured provider produced. One per call, never
/// cached or shared across resources.
#[derive(Debug, Clone)]
pub struct Setup {
    /// Configuration the provider was configured with.
    pub configuration: Configuration,
    /// Opaque handle for per-resource CRUD logic.
    pub meta: ProviderMeta,
}

/// One-shot configuration entry point of the wrapped Terraform provider.
///
/// The underlying plugin SDK configures a provider value only once, so a
/// shared instance reused across concurrent setup calls would race. The
/// `Clone` bound makes the required isolation explicit: the setup builder
/// clones its prototype and each `configure` call consumes a private copy.
#[async_trait]
pub trait TerraformProvider: Clone + Send + Sync + 'static {
    /// Configure this provider value with the given configuration map,
    /// consuming it. Errors here typically mean the target OpenSearch
    /// cluster is unreachable and are worth retrying.
    async fn configure(self, configuration: Configuration) -> Result<ProviderMeta>;
}
