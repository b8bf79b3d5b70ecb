//! Tenant session: the resolver, controller and consistency trigger
//! wired together behind the API a hosting UI consumes.

use std::sync::Arc;

use orgscope_core::directory::{ImpersonationSessionStore, SessionDirectory};
use orgscope_core::models::organization::Organization;
use orgscope_core::models::role::Role;
use tokio::sync::watch;

use crate::config::ContextConfig;
use crate::context::TenantContext;
use crate::controller::{ImpersonationController, Navigation};
use crate::error::ContextError;
use crate::resolver::TenantContextResolver;
use crate::trigger::ConsistencyTrigger;

pub struct TenantSession<D: SessionDirectory, S: ImpersonationSessionStore> {
    directory: Arc<D>,
    store: Arc<S>,
    resolver: TenantContextResolver<D, S>,
    controller: ImpersonationController<S>,
    trigger: ConsistencyTrigger,
}

impl<D: SessionDirectory, S: ImpersonationSessionStore> TenantSession<D, S> {
    pub fn new(directory: Arc<D>, store: Arc<S>, config: ContextConfig) -> Self {
        Self {
            resolver: TenantContextResolver::new(directory.clone(), store.clone()),
            controller: ImpersonationController::new(store.clone(), config.clone()),
            trigger: ConsistencyTrigger::new(&config),
            directory,
            store,
        }
    }

    pub fn context(&self) -> TenantContext {
        self.resolver.context()
    }

    pub fn subscribe(&self) -> watch::Receiver<TenantContext> {
        self.resolver.subscribe()
    }

    pub fn resolver(&self) -> &TenantContextResolver<D, S> {
        &self.resolver
    }

    pub async fn resolve(&self) -> TenantContext {
        self.resolver.resolve().await
    }

    pub async fn refresh(&self) {
        self.resolver.refresh().await;
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.resolver.context().has_role(required)
    }

    pub fn is_impersonating(&self) -> bool {
        self.resolver.context().is_impersonating
    }

    /// Report a route change. Re-resolves only when the target is a
    /// checkpoint and the context has drifted; returns whether it did.
    pub async fn navigate(&self, target: &str) -> bool {
        let context = self.resolver.context();
        if !self.trigger.observe(target, &*self.store, &context) {
            return false;
        }
        self.resolver.refresh().await;
        true
    }

    pub fn begin_impersonating(
        &self,
        organization: &Organization,
        current_location: &str,
    ) -> Result<Navigation, ContextError> {
        self.controller
            .begin_impersonating(&self.resolver.context(), organization, current_location)
    }

    /// End impersonation and publish the identity's own context before
    /// the host navigates to the return path.
    pub async fn end_impersonating(&self) -> Result<Navigation, ContextError> {
        let navigation = self.controller.end_impersonating()?;
        self.resolver.refresh().await;
        Ok(navigation)
    }

    /// Sign out and publish the resulting unauthenticated context.
    pub async fn sign_out(&self) -> Result<Navigation, ContextError> {
        let navigation = self.controller.sign_out(&*self.directory).await?;
        self.resolver.refresh().await;
        Ok(navigation)
    }
}
