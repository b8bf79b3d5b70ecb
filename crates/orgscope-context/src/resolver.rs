//! Tenant context resolver: converts "current identity + current
//! impersonation session" into a [`TenantContext`].
//!
//! Resolution never fails outward: every directory or storage failure is
//! logged and folded into [`TenantContext::error`].
//!
//! Each call to [`TenantContextResolver::resolve`] draws a monotonic epoch
//! before it first suspends. A finished resolution is published only if
//! no newer one has been issued since, so a slow stale read can never
//! overwrite a fresher context regardless of completion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use orgscope_core::directory::{ImpersonationSessionStore, SessionDirectory};
use orgscope_core::models::branding::Branding;
use orgscope_core::models::feature::FeatureFlags;
use orgscope_core::models::identity::Identity;
use orgscope_core::models::impersonation::ImpersonationSession;
use orgscope_core::models::role::Role;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::context::TenantContext;
use crate::error::ContextError;

/// Outcome of resolving against a valid impersonation session.
enum Impersonated {
    Resolved(TenantContext),
    TargetMissing,
}

pub struct TenantContextResolver<D: SessionDirectory, S: ImpersonationSessionStore> {
    directory: Arc<D>,
    store: Arc<S>,
    issued: AtomicU64,
    state: watch::Sender<TenantContext>,
}

impl<D: SessionDirectory, S: ImpersonationSessionStore> TenantContextResolver<D, S> {
    pub fn new(directory: Arc<D>, store: Arc<S>) -> Self {
        let (state, _) = watch::channel(TenantContext::initial());
        Self {
            directory,
            store,
            issued: AtomicU64::new(0),
            state,
        }
    }

    /// The most recently published context.
    pub fn context(&self) -> TenantContext {
        self.state.borrow().clone()
    }

    /// Receive every published context.
    pub fn subscribe(&self) -> watch::Receiver<TenantContext> {
        self.state.subscribe()
    }

    /// Epoch of the most recently issued resolution.
    pub fn latest_epoch(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Resolve and publish a fresh context.
    ///
    /// Returns the context this call computed, even when a newer
    /// resolution superseded it and it was therefore not published.
    pub async fn resolve(&self) -> TenantContext {
        let epoch = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(epoch, "Resolving tenant context");

        let context = self.compute().await;
        self.publish(epoch, &context);
        context
    }

    /// Force a resolution, discarding the returned snapshot.
    pub async fn refresh(&self) {
        self.resolve().await;
    }

    fn publish(&self, epoch: u64, context: &TenantContext) -> bool {
        self.state.send_if_modified(|current| {
            let latest = self.issued.load(Ordering::SeqCst);
            if latest != epoch {
                debug!(epoch, latest, "Discarding superseded tenant context");
                return false;
            }
            *current = context.clone();
            true
        })
    }

    async fn compute(&self) -> TenantContext {
        let identity = match self.directory.current_identity().await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                debug!("No authenticated identity");
                return TenantContext::failed(None, ContextError::Unauthenticated);
            }
            Err(e) => {
                error!(error = %e, "Failed to read current identity");
                return TenantContext::failed(None, e.into());
            }
        };

        let session = match self.take_valid_session(identity.id) {
            Ok(session) => session,
            Err(e) => {
                error!(identity_id = %identity.id, error = %e, "Failed to read impersonation session");
                return TenantContext::failed(Some(identity.id), e);
            }
        };

        if let Some(session) = session {
            match self.impersonated_context(&identity, &session).await {
                Ok(Impersonated::Resolved(context)) => return context,
                Ok(Impersonated::TargetMissing) => {
                    warn!(
                        identity_id = %identity.id,
                        organization_id = %session.target_organization_id,
                        "Impersonated organization not found; clearing session"
                    );
                    if let Err(e) = self.clear_if_current(&session) {
                        error!(error = %e, "Failed to clear impersonation session");
                    }
                    let mut context = self.own_or_failed(&identity).await;
                    if context.error.is_none() {
                        context.error = Some(ContextError::ImpersonatedOrgMissing);
                    }
                    return context;
                }
                Err(e) => {
                    error!(
                        identity_id = %identity.id,
                        organization_id = %session.target_organization_id,
                        error = %e,
                        "Failed to resolve impersonated context"
                    );
                    return TenantContext::failed(Some(identity.id), e);
                }
            }
        }

        self.own_or_failed(&identity).await
    }

    /// Read the stored session, discarding it if it belongs to another
    /// identity. Runs without suspending so nothing can interleave between
    /// the read and the clear.
    fn take_valid_session(
        &self,
        identity_id: Uuid,
    ) -> Result<Option<ImpersonationSession>, ContextError> {
        let Some(session) = self.store.read()? else {
            return Ok(None);
        };

        if session.is_valid_for(identity_id) {
            return Ok(Some(session));
        }

        warn!(
            identity_id = %identity_id,
            acting_identity_id = %session.acting_identity_id,
            "Discarding impersonation session owned by another identity"
        );
        if let Err(e) = self.store.clear() {
            error!(error = %e, "Failed to clear stale impersonation session");
        }
        Ok(None)
    }

    /// Clear the store only if it still holds `session`.
    fn clear_if_current(&self, session: &ImpersonationSession) -> Result<(), ContextError> {
        if self.store.read()?.as_ref() == Some(session) {
            self.store.clear()?;
        }
        Ok(())
    }

    async fn impersonated_context(
        &self,
        identity: &Identity,
        session: &ImpersonationSession,
    ) -> Result<Impersonated, ContextError> {
        let target_id = session.target_organization_id;
        let (organization, branding, records, assignment) = tokio::try_join!(
            self.directory.get_organization(target_id),
            self.directory.get_branding(target_id),
            self.directory.list_feature_flags(target_id),
            self.directory.get_role_assignment(identity.id),
        )?;

        let Some(organization) = organization else {
            return Ok(Impersonated::TargetMissing);
        };

        // The acting identity's own role decides capability, never the
        // target organization's.
        let real_role = assignment.map(|a| a.role);
        let role = match real_role {
            Some(role) if role.at_least(Role::Admin) => Role::Admin,
            other => {
                warn!(
                    identity_id = %identity.id,
                    real_role = ?other,
                    "Impersonation session held by a non-admin identity; falling back to client_admin"
                );
                Role::ClientAdmin
            }
        };

        info!(
            identity_id = %identity.id,
            organization_id = %organization.id,
            role = %role,
            "Resolved impersonated tenant context"
        );

        Ok(Impersonated::Resolved(TenantContext {
            identity_id: Some(identity.id),
            branding: Branding::or_default_for(branding, organization.id),
            features: FeatureFlags::from_records(&records),
            organization: Some(organization),
            role: Some(role),
            is_impersonating: true,
            loading: false,
            error: None,
        }))
    }

    async fn own_or_failed(&self, identity: &Identity) -> TenantContext {
        match self.own_context(identity).await {
            Ok(context) => context,
            Err(e) => {
                if e.requires_provisioning() {
                    info!(identity_id = %identity.id, "Identity has no organization");
                } else {
                    error!(identity_id = %identity.id, error = %e, "Failed to resolve tenant context");
                }
                TenantContext::failed(Some(identity.id), e)
            }
        }
    }

    async fn own_context(&self, identity: &Identity) -> Result<TenantContext, ContextError> {
        let Some(assignment) = self.directory.get_role_assignment(identity.id).await? else {
            return Err(ContextError::NoOrganization);
        };

        let Some(organization_id) = assignment.organization_id else {
            if assignment.role == Role::Admin {
                debug!(identity_id = %identity.id, "Admin without a selected tenant");
                return Ok(TenantContext {
                    identity_id: Some(identity.id),
                    organization: None,
                    branding: Branding::default(),
                    features: FeatureFlags::admin_defaults(),
                    role: Some(Role::Admin),
                    is_impersonating: false,
                    loading: false,
                    error: None,
                });
            }
            return Err(ContextError::NoOrganization);
        };

        let (organization, branding, records) = tokio::try_join!(
            self.directory.get_organization(organization_id),
            self.directory.get_branding(organization_id),
            self.directory.list_feature_flags(organization_id),
        )?;

        let Some(organization) = organization else {
            warn!(
                identity_id = %identity.id,
                organization_id = %organization_id,
                "Assigned organization does not exist"
            );
            return Err(ContextError::NoOrganization);
        };

        Ok(TenantContext {
            identity_id: Some(identity.id),
            branding: Branding::or_default_for(branding, organization.id),
            features: FeatureFlags::from_records(&records),
            organization: Some(organization),
            role: Some(assignment.role),
            is_impersonating: false,
            loading: false,
            error: None,
        })
    }
}
