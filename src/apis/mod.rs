//! # API types
//!
//! The ProviderConfig family of custom resources in both supported
//! generations, plus the capability surface managed resources expose to the
//! resolution path.

pub mod cluster;
pub mod common;
pub mod managed;
pub mod namespaced;
