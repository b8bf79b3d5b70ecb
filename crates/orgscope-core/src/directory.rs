//! Collaborator traits consumed by the tenant context resolver.
//!
//! The session directory is async and transport-agnostic: "not found" is
//! `Ok(None)`, transport failures are `Err`. The impersonation session
//! store is synchronous; a read followed by a clear never yields to the
//! scheduler.

use uuid::Uuid;

use crate::error::OrgscopeResult;
use crate::models::{
    branding::Branding, feature::FeatureFlag, identity::Identity,
    impersonation::ImpersonationSession, organization::Organization, role::RoleAssignment,
};

// ---------------------------------------------------------------------------
// Session directory (remote, read-only)
// ---------------------------------------------------------------------------

pub trait SessionDirectory: Send + Sync {
    /// The authenticated principal, if any.
    fn current_identity(&self) -> impl Future<Output = OrgscopeResult<Option<Identity>>> + Send;

    /// The identity's active role assignment.
    fn get_role_assignment(
        &self,
        identity_id: Uuid,
    ) -> impl Future<Output = OrgscopeResult<Option<RoleAssignment>>> + Send;

    fn get_organization(
        &self,
        id: Uuid,
    ) -> impl Future<Output = OrgscopeResult<Option<Organization>>> + Send;

    fn get_branding(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = OrgscopeResult<Option<Branding>>> + Send;

    fn list_feature_flags(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = OrgscopeResult<Vec<FeatureFlag>>> + Send;

    /// End the authenticated session.
    fn sign_out(&self) -> impl Future<Output = OrgscopeResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Impersonation session store (local, durable)
// ---------------------------------------------------------------------------

/// Durable per-profile storage for the single impersonation record.
///
/// Implementations must write and clear all fields together; a reader
/// never observes a partially written session.
pub trait ImpersonationSessionStore: Send + Sync {
    fn read(&self) -> OrgscopeResult<Option<ImpersonationSession>>;
    fn write(&self, session: &ImpersonationSession) -> OrgscopeResult<()>;
    /// Remove the record. Clearing an empty store is a no-op.
    fn clear(&self) -> OrgscopeResult<()>;
}
