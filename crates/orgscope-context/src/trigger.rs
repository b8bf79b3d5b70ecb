//! Consistency trigger: re-syncs the resolver when the stored
//! impersonation session and the published context disagree.
//!
//! Only two navigation checkpoints are observed: arriving at the root
//! view (impersonation just started) and arriving at the admin view
//! (impersonation just ended). Other route changes never cause a
//! directory read.

use orgscope_core::directory::ImpersonationSessionStore;
use tracing::{debug, warn};

use crate::config::ContextConfig;
use crate::context::TenantContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Root,
    Admin,
}

#[derive(Debug, Clone)]
pub struct ConsistencyTrigger {
    root_path: String,
    admin_path: String,
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

impl ConsistencyTrigger {
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            root_path: normalize(&config.root_path).to_owned(),
            admin_path: normalize(&config.admin_path).to_owned(),
        }
    }

    /// Which checkpoint, if any, a navigation target lands on.
    pub fn checkpoint(&self, target: &str) -> Option<Checkpoint> {
        let target = normalize(target);
        if target == self.root_path {
            Some(Checkpoint::Root)
        } else if target == self.admin_path {
            Some(Checkpoint::Admin)
        } else {
            None
        }
    }

    /// Pure drift check: resync at a checkpoint when a valid session's
    /// presence disagrees with the context's impersonation flag.
    pub fn should_resync(&self, target: &str, session_present: bool, context_flag: bool) -> bool {
        self.checkpoint(target).is_some() && session_present != context_flag
    }

    /// Evaluate the drift check against the live store.
    ///
    /// A session counts as present only if it belongs to the identity the
    /// context was resolved for. An unreadable store forces a resync so the
    /// resolver can surface the failure. A context holding a retryable
    /// failure is left alone; recovering from it takes an explicit refresh.
    pub fn observe<S: ImpersonationSessionStore + ?Sized>(
        &self,
        target: &str,
        store: &S,
        context: &TenantContext,
    ) -> bool {
        let Some(checkpoint) = self.checkpoint(target) else {
            return false;
        };

        if let Some(error) = context.error.as_ref().filter(|e| e.is_retryable()) {
            debug!(?checkpoint, error = %error, "Skipping resync of failed tenant context");
            return false;
        }

        let session_present = match store.read() {
            Ok(session) => session.is_some_and(|s| {
                context
                    .identity_id
                    .is_some_and(|identity_id| s.is_valid_for(identity_id))
            }),
            Err(e) => {
                warn!(error = %e, "Impersonation session unreadable at checkpoint");
                return true;
            }
        };

        let resync = session_present != context.is_impersonating;
        if resync {
            debug!(
                ?checkpoint,
                session_present,
                is_impersonating = context.is_impersonating,
                "Tenant context drifted from impersonation session"
            );
        }
        resync
    }
}
