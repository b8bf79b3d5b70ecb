//! orgscope Core: domain models, the role hierarchy, feature flag
//! evaluation, and the collaborator traits consumed by the tenant
//! context resolver.

pub mod directory;
pub mod error;
pub mod models;

pub use error::{OrgscopeError, OrgscopeResult};
