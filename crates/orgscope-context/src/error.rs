//! Tenant context error types.
//!
//! These values are stored inside a published [`TenantContext`], so they
//! are plain data: cloneable, comparable and serializable.
//!
//! [`TenantContext`]: crate::context::TenantContext

use orgscope_core::error::OrgscopeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ContextError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("no organization assigned")]
    NoOrganization,

    #[error("Impersonated organization not found")]
    ImpersonatedOrgMissing,

    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("invalid impersonation request: {reason}")]
    InvalidImpersonationRequest { reason: String },

    #[error("impersonation session storage failed: {0}")]
    SessionStore(String),
}

impl ContextError {
    pub(crate) fn invalid_request(reason: impl Into<String>) -> Self {
        ContextError::InvalidImpersonationRequest {
            reason: reason.into(),
        }
    }

    /// The UI should send the user to the login view.
    pub fn requires_login(&self) -> bool {
        matches!(self, ContextError::Unauthenticated)
    }

    /// The user is authenticated but not provisioned; this is not a
    /// transient failure and retrying will not help.
    pub fn requires_provisioning(&self) -> bool {
        matches!(self, ContextError::NoOrganization)
    }

    /// A manual `refresh()` may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ContextError::DirectoryUnavailable(_) | ContextError::SessionStore(_)
        )
    }
}

impl From<OrgscopeError> for ContextError {
    fn from(err: OrgscopeError) -> Self {
        match err {
            OrgscopeError::Storage(_) | OrgscopeError::Serialization(_) => {
                ContextError::SessionStore(err.to_string())
            }
            other => ContextError::DirectoryUnavailable(other.to_string()),
        }
    }
}
