//! Domain models for orgscope.
//!
//! Directory-owned records (identity, organization, role assignment,
//! branding, feature flags) are read-only from this crate's perspective.
//! The impersonation session is the only record owned locally.

pub mod branding;
pub mod feature;
pub mod identity;
pub mod impersonation;
pub mod organization;
pub mod role;
