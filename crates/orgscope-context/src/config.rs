//! Tenant context configuration.

use crate::error::ContextError;

/// Navigation paths the resolver, trigger and controller agree on.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Root view; impersonation always starts here (default: `/`).
    pub root_path: String,
    /// Admin console root; the default return target (default: `/admin`).
    pub admin_path: String,
    /// Login view for unauthenticated sessions (default: `/login`).
    pub login_path: String,
    /// Remediation view for identities without an organization
    /// (default: `/onboarding`).
    pub onboarding_path: String,
}

impl ContextConfig {
    /// Where the UI should send the user for a context-level error, if
    /// anywhere.
    pub fn route_for_error(&self, error: &ContextError) -> Option<&str> {
        if error.requires_login() {
            Some(&self.login_path)
        } else if error.requires_provisioning() {
            Some(&self.onboarding_path)
        } else {
            None
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            root_path: "/".into(),
            admin_path: "/admin".into(),
            login_path: "/login".into(),
            onboarding_path: "/onboarding".into(),
        }
    }
}
