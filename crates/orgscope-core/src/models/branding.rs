//! Branding domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PRIMARY_COLOR: &str = "#3B82F6";
pub const DEFAULT_SECONDARY_COLOR: &str = "#10B981";
pub const DEFAULT_ACCENT_COLOR: &str = "#F59E0B";

/// Per-organization look and feel, one-to-one with [`Organization`].
///
/// Organizations without a branding record get [`Branding::default_for`].
///
/// [`Organization`]: crate::models::organization::Organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    /// `None` only for the default branding of an organization-less session.
    pub organization_id: Option<Uuid>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub logo_url: Option<String>,
    pub custom_css: Option<String>,
}

impl Branding {
    pub fn default_for(organization_id: Uuid) -> Self {
        Self {
            organization_id: Some(organization_id),
            ..Self::default()
        }
    }

    /// Use the stored record if present, otherwise the defaults.
    pub fn or_default_for(branding: Option<Branding>, organization_id: Uuid) -> Self {
        branding.unwrap_or_else(|| Self::default_for(organization_id))
    }
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            organization_id: None,
            primary_color: DEFAULT_PRIMARY_COLOR.into(),
            secondary_color: DEFAULT_SECONDARY_COLOR.into(),
            accent_color: DEFAULT_ACCENT_COLOR.into(),
            logo_url: None,
            custom_css: None,
        }
    }
}
