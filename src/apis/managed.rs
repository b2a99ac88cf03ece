//! # Managed resource capability surface
//!
//! Generated managed resource kinds come in two generations: legacy kinds
//! carry a name-only reference to a cluster-scoped ProviderConfig, modern
//! kinds carry a kinded reference resolved in (or ignoring) their own
//! namespace. Rather than inspecting runtime types, resolution dispatches on
//! a closed set of reference shapes the resource exposes through
//! [`Managed::provider_config`].

use super::common::{Reference, TypedReference};

/// The provider-config reference shape a managed resource exposes.
///
/// `None` inside a variant means the resource is of that generation but its
/// reference field is unset, which is a user input defect. A resource that
/// exposes neither shape (the accessor returns `Option::None`) was generated
/// without implementing either capability, which is a generation defect.
#[derive(Debug, Clone, Copy)]
pub enum ProviderConfigAccess<'a> {
    /// Legacy generation: name-only reference, always cluster-scoped.
    Legacy(Option<&'a Reference>),
    /// Modern generation: kinded reference, namespace implied by the
    /// resource's own namespace.
    Modern(Option<&'a TypedReference>),
}

/// A managed resource as seen by provider-config resolution and usage
/// tracking. Generated kinds implement this; exactly one reference shape must
/// be exposed.
pub trait Managed: Send + Sync {
    /// Name of the resource.
    fn name(&self) -> &str;

    /// Namespace of the resource, `None` for cluster-scoped kinds.
    fn namespace(&self) -> Option<&str>;

    /// UID of the resource, used to derive usage record names.
    fn uid(&self) -> &str;

    /// API version of the resource kind.
    fn api_version(&self) -> &str;

    /// Kind of the resource.
    fn kind(&self) -> &str;

    /// The provider-config reference shape this resource exposes.
    ///
    /// The default returns `None`, surfacing kinds generated without a
    /// proper reference implementation as unsupported rather than panicking.
    fn provider_config(&self) -> Option<ProviderConfigAccess<'_>> {
        None
    }
}
