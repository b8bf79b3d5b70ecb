//! SurrealDB implementation of [`SessionDirectory`].
//!
//! Directory reads map missing records to `Ok(None)`. The authenticated
//! identity is held in memory for the lifetime of the directory handle;
//! the database only stores what the identity is assigned to.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use orgscope_core::directory::SessionDirectory;
use orgscope_core::error::OrgscopeResult;
use orgscope_core::models::branding::Branding;
use orgscope_core::models::feature::FeatureFlag;
use orgscope_core::models::identity::Identity;
use orgscope_core::models::organization::{
    CreateOrganization, Organization, OrganizationStatus,
};
use orgscope_core::models::role::{Role, RoleAssignment};
use parking_lot::RwLock;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    name: String,
    industry: Option<String>,
    website: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl OrganizationRow {
    fn into_organization(self, id: Uuid) -> Result<Organization, DbError> {
        let status = self
            .status
            .parse::<OrganizationStatus>()
            .map_err(|()| DbError::InvalidRecord {
                entity: "organization".into(),
                message: format!("unknown status: {}", self.status),
            })?;
        Ok(Organization {
            id,
            name: self.name,
            industry: self.industry,
            website: self.website,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct RoleAssignmentRow {
    organization_id: Option<String>,
    role: String,
}

#[derive(Debug, SurrealValue)]
struct BrandingRow {
    primary_color: String,
    secondary_color: String,
    accent_color: String,
    logo_url: Option<String>,
    custom_css: Option<String>,
}

#[derive(Debug, SurrealValue)]
struct FeatureFlagRow {
    organization_id: String,
    feature_name: String,
    is_enabled: bool,
}

fn parse_uuid(entity: &str, value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::InvalidRecord {
        entity: entity.into(),
        message: format!("invalid UUID: {e}"),
    })
}

fn feature_flag_key(organization_id: Uuid, feature_name: &str) -> String {
    format!("{organization_id}_{feature_name}")
}

/// SurrealDB-backed session directory.
#[derive(Clone)]
pub struct SurrealSessionDirectory<C: Connection> {
    db: Surreal<C>,
    identity: Arc<RwLock<Option<Identity>>>,
}

impl<C: Connection> SurrealSessionDirectory<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db,
            identity: Arc::new(RwLock::new(None)),
        }
    }

    /// Bind an authenticated identity to this directory handle.
    pub fn sign_in(&self, identity: Identity) {
        info!(identity_id = %identity.id, "Identity signed in");
        *self.identity.write() = Some(identity);
    }

    // -------------------------------------------------------------------
    // Provisioning (used by operators and tests)
    // -------------------------------------------------------------------

    pub async fn create_organization(
        &self,
        input: CreateOrganization,
    ) -> OrgscopeResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let status = input.status.unwrap_or(OrganizationStatus::Active);

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 name = $name, industry = $industry, \
                 website = $website, status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("industry", input.industry))
            .bind(("website", input.website))
            .bind(("status", status.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id)?)
    }

    pub async fn delete_organization(&self, id: Uuid) -> OrgscopeResult<()> {
        self.db
            .query("DELETE type::record('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    /// Replace the identity's active role assignment.
    pub async fn assign_role(&self, assignment: RoleAssignment) -> OrgscopeResult<()> {
        self.db
            .query(
                "UPSERT type::record('role_assignment', $identity_id) SET \
                 organization_id = $organization_id, role = $role, \
                 updated_at = time::now()",
            )
            .bind(("identity_id", assignment.identity_id.to_string()))
            .bind((
                "organization_id",
                assignment.organization_id.map(|id| id.to_string()),
            ))
            .bind(("role", assignment.role.as_str()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    pub async fn remove_role_assignment(&self, identity_id: Uuid) -> OrgscopeResult<()> {
        self.db
            .query("DELETE type::record('role_assignment', $identity_id)")
            .bind(("identity_id", identity_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    /// Store branding for the organization named in `branding`.
    pub async fn put_branding(&self, branding: Branding) -> OrgscopeResult<()> {
        let organization_id = branding.organization_id.ok_or_else(|| DbError::InvalidRecord {
            entity: "branding".into(),
            message: "branding must belong to an organization".into(),
        })?;

        self.db
            .query(
                "UPSERT type::record('branding', $organization_id) SET \
                 primary_color = $primary_color, \
                 secondary_color = $secondary_color, \
                 accent_color = $accent_color, \
                 logo_url = $logo_url, custom_css = $custom_css",
            )
            .bind(("organization_id", organization_id.to_string()))
            .bind(("primary_color", branding.primary_color))
            .bind(("secondary_color", branding.secondary_color))
            .bind(("accent_color", branding.accent_color))
            .bind(("logo_url", branding.logo_url))
            .bind(("custom_css", branding.custom_css))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    pub async fn set_feature_flag(&self, flag: FeatureFlag) -> OrgscopeResult<()> {
        self.db
            .query(
                "UPSERT type::record('feature_flag', $id) SET \
                 organization_id = $organization_id, \
                 feature_name = $feature_name, is_enabled = $is_enabled",
            )
            .bind(("id", feature_flag_key(flag.organization_id, &flag.feature_name)))
            .bind(("organization_id", flag.organization_id.to_string()))
            .bind(("feature_name", flag.feature_name))
            .bind(("is_enabled", flag.is_enabled))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}

impl<C: Connection> SessionDirectory for SurrealSessionDirectory<C> {
    async fn current_identity(&self) -> OrgscopeResult<Option<Identity>> {
        Ok(self.identity.read().clone())
    }

    async fn get_role_assignment(&self, identity_id: Uuid) -> OrgscopeResult<Option<RoleAssignment>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('role_assignment', $identity_id)")
            .bind(("identity_id", identity_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleAssignmentRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let organization_id = row
            .organization_id
            .as_deref()
            .map(|id| parse_uuid("role_assignment", id))
            .transpose()?;

        Ok(Some(RoleAssignment {
            identity_id,
            organization_id,
            role: Role::from_name(&row.role),
        }))
    }

    async fn get_organization(&self, id: Uuid) -> OrgscopeResult<Option<Organization>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_organization(id)?)),
            None => Ok(None),
        }
    }

    async fn get_branding(&self, organization_id: Uuid) -> OrgscopeResult<Option<Branding>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('branding', $organization_id)")
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BrandingRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|row| Branding {
            organization_id: Some(organization_id),
            primary_color: row.primary_color,
            secondary_color: row.secondary_color,
            accent_color: row.accent_color,
            logo_url: row.logo_url,
            custom_css: row.custom_css,
        }))
    }

    async fn list_feature_flags(&self, organization_id: Uuid) -> OrgscopeResult<Vec<FeatureFlag>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM feature_flag \
                 WHERE organization_id = $organization_id \
                 ORDER BY feature_name ASC",
            )
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FeatureFlagRow> = result.take(0).map_err(DbError::from)?;
        let flags = rows
            .into_iter()
            .map(|row| {
                Ok(FeatureFlag {
                    organization_id: parse_uuid("feature_flag", &row.organization_id)?,
                    feature_name: row.feature_name,
                    is_enabled: row.is_enabled,
                })
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(flags)
    }

    async fn sign_out(&self) -> OrgscopeResult<()> {
        if let Some(identity) = self.identity.write().take() {
            info!(identity_id = %identity.id, "Identity signed out");
        }
        Ok(())
    }
}
