//! Impersonation controller: the only component that creates or tears
//! down an impersonation session.

use std::sync::Arc;

use orgscope_core::directory::{ImpersonationSessionStore, SessionDirectory};
use orgscope_core::models::impersonation::ImpersonationSession;
use orgscope_core::models::organization::Organization;
use orgscope_core::models::role::Role;
use tracing::{error, info};

use crate::config::ContextConfig;
use crate::context::TenantContext;
use crate::error::ContextError;

/// Where the host UI must go after a controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Full page navigation. Every cached view is discarded, so no view
    /// can keep showing data from the previous tenant.
    HardReload(String),
}

impl Navigation {
    pub fn target(&self) -> &str {
        match self {
            Navigation::HardReload(path) => path,
        }
    }
}

pub struct ImpersonationController<S: ImpersonationSessionStore> {
    store: Arc<S>,
    config: ContextConfig,
}

impl<S: ImpersonationSessionStore> ImpersonationController<S> {
    pub fn new(store: Arc<S>, config: ContextConfig) -> Self {
        Self { store, config }
    }

    /// Start viewing `organization` as its client admin would.
    ///
    /// Preconditions are checked before anything is written: the context
    /// must be resolved for a live identity holding the admin role, and no
    /// impersonation may be active. Violations return
    /// [`ContextError::InvalidImpersonationRequest`] and leave the store
    /// untouched.
    pub fn begin_impersonating(
        &self,
        context: &TenantContext,
        organization: &Organization,
        current_location: &str,
    ) -> Result<Navigation, ContextError> {
        if context.loading {
            return Err(ContextError::invalid_request(
                "tenant context has not been resolved",
            ));
        }
        let Some(identity_id) = context.identity_id else {
            return Err(ContextError::invalid_request("no authenticated identity"));
        };
        if !context.has_role(Role::Admin) {
            return Err(ContextError::invalid_request(
                "only admins may impersonate an organization",
            ));
        }
        if context.is_impersonating {
            return Err(ContextError::invalid_request(
                "already impersonating an organization",
            ));
        }
        if let Some(active) = self.store.read()? {
            if active.is_valid_for(identity_id) {
                return Err(ContextError::invalid_request(
                    "an impersonation session is already active",
                ));
            }
        }

        let session = ImpersonationSession {
            target_organization_id: organization.id,
            acting_identity_id: identity_id,
            target_organization_name: organization.name.clone(),
            return_path: current_location.to_owned(),
        };
        self.store.write(&session)?;

        info!(
            acting_identity_id = %identity_id,
            organization_id = %organization.id,
            organization_name = %organization.name,
            return_path = %current_location,
            "Impersonation started"
        );

        Ok(Navigation::HardReload(self.config.root_path.clone()))
    }

    /// Return to the admin console. Without an active session this only
    /// navigates to the admin root.
    pub fn end_impersonating(&self) -> Result<Navigation, ContextError> {
        let session = self.store.read()?;
        let return_path = session
            .as_ref()
            .map(|s| s.return_path.as_str())
            .filter(|path| !path.is_empty())
            .unwrap_or(&self.config.admin_path)
            .to_owned();

        if let Some(session) = &session {
            self.store.clear()?;
            info!(
                acting_identity_id = %session.acting_identity_id,
                organization_id = %session.target_organization_id,
                return_path = %return_path,
                "Impersonation ended"
            );
        }

        Ok(Navigation::HardReload(return_path))
    }

    /// Sign out of the directory, discarding any impersonation session
    /// first.
    pub async fn sign_out<D: SessionDirectory>(
        &self,
        directory: &D,
    ) -> Result<Navigation, ContextError> {
        if let Err(e) = self.store.clear() {
            error!(error = %e, "Failed to clear impersonation session on sign-out");
        }
        directory.sign_out().await?;
        info!("Signed out");
        Ok(Navigation::HardReload(self.config.login_path.clone()))
    }
}
