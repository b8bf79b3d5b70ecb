//! The UI-facing tenant context snapshot and the capability checks
//! derived from it.
//!
//! Capability answers here drive presentation only. The directory
//! service enforces access control independently.

use orgscope_core::models::branding::Branding;
use orgscope_core::models::feature::{Feature, FeatureFlags};
use orgscope_core::models::organization::Organization;
use orgscope_core::models::role::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ContextError;

/// Fully resolved organization, branding, features and role for the
/// current session.
///
/// Every resolution produces a complete replacement; fields are never
/// patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// The live identity this context was resolved for.
    pub identity_id: Option<Uuid>,
    /// `None` for an admin without a selected tenant, and on error.
    pub organization: Option<Organization>,
    pub branding: Branding,
    pub features: FeatureFlags,
    /// Effective role; while impersonating this is the acting admin's.
    pub role: Option<Role>,
    pub is_impersonating: bool,
    pub loading: bool,
    pub error: Option<ContextError>,
}

impl TenantContext {
    /// The value published before the first resolution completes.
    pub fn initial() -> Self {
        Self {
            identity_id: None,
            organization: None,
            branding: Branding::default(),
            features: FeatureFlags::default(),
            role: None,
            is_impersonating: false,
            loading: true,
            error: None,
        }
    }

    /// A completed resolution that failed.
    pub fn failed(identity_id: Option<Uuid>, error: ContextError) -> Self {
        Self {
            identity_id,
            loading: false,
            error: Some(error),
            ..Self::initial()
        }
    }

    pub fn organization_id(&self) -> Option<Uuid> {
        self.organization.as_ref().map(|org| org.id)
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.role.is_some_and(|role| role.at_least(required))
    }

    pub fn is_owner(&self) -> bool {
        self.has_role(Role::Owner)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_manager(&self) -> bool {
        self.has_role(Role::Manager)
    }

    // Management capabilities are granted to every known role above `user`.

    pub fn can_manage_users(&self) -> bool {
        self.has_role(Role::Manager)
    }

    pub fn can_manage_settings(&self) -> bool {
        self.has_role(Role::Manager)
    }

    pub fn can_manage_leads(&self) -> bool {
        self.has_role(Role::Manager)
    }

    pub fn is_feature_enabled(&self, feature: Feature) -> bool {
        self.features.is_enabled(feature)
    }

    /// Name of the organization being viewed as, while impersonating.
    pub fn impersonation_banner(&self) -> Option<&str> {
        if !self.is_impersonating {
            return None;
        }
        self.organization.as_ref().map(|org| org.name.as_str())
    }
}

impl Default for TenantContext {
    fn default() -> Self {
        Self::initial()
    }
}
