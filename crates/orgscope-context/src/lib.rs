//! orgscope Context: tenant context resolution, the consistency
//! trigger, and admin impersonation.
//!
//! For any authenticated session this crate decides which organization's
//! data is visible, the effective role, which features apply, and whether
//! an admin is currently viewing the dashboard as a client organization.

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod resolver;
pub mod session;
pub mod store;
pub mod trigger;

pub use config::ContextConfig;
pub use context::TenantContext;
pub use controller::{ImpersonationController, Navigation};
pub use error::ContextError;
pub use resolver::TenantContextResolver;
pub use session::TenantSession;
pub use store::{FileImpersonationStore, MemoryImpersonationStore};
pub use trigger::{Checkpoint, ConsistencyTrigger};
