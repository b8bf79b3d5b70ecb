//! Shared test fixtures: an in-memory session directory with failure
//! injection and a gate for holding a resolution mid-flight.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use orgscope_context::{ContextConfig, MemoryImpersonationStore, TenantSession};
use orgscope_core::directory::SessionDirectory;
use orgscope_core::error::{OrgscopeError, OrgscopeResult};
use orgscope_core::models::branding::Branding;
use orgscope_core::models::feature::FeatureFlag;
use orgscope_core::models::identity::Identity;
use orgscope_core::models::organization::{Organization, OrganizationStatus};
use orgscope_core::models::role::{Role, RoleAssignment};
use parking_lot::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

#[derive(Default)]
pub struct FakeDirectory {
    identity: Mutex<Option<Identity>>,
    assignments: Mutex<HashMap<Uuid, RoleAssignment>>,
    organizations: Mutex<HashMap<Uuid, Organization>>,
    branding: Mutex<HashMap<Uuid, Branding>>,
    flags: Mutex<Vec<FeatureFlag>>,
    unavailable: AtomicBool,
    identity_gate: Mutex<Option<Arc<Notify>>>,
    reads: AtomicUsize,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, identity_id: Uuid) {
        *self.identity.lock() = Some(Identity::new(identity_id));
    }

    pub fn add_organization(&self, name: &str) -> Organization {
        let org = Organization {
            id: Uuid::new_v4(),
            name: name.into(),
            industry: None,
            website: None,
            status: OrganizationStatus::Active,
            created_at: Utc::now(),
        };
        self.organizations.lock().insert(org.id, org.clone());
        org
    }

    pub fn remove_organization(&self, id: Uuid) {
        self.organizations.lock().remove(&id);
    }

    pub fn assign(&self, identity_id: Uuid, organization_id: Option<Uuid>, role: Role) {
        self.assignments.lock().insert(
            identity_id,
            RoleAssignment {
                identity_id,
                organization_id,
                role,
            },
        );
    }

    pub fn unassign(&self, identity_id: Uuid) {
        self.assignments.lock().remove(&identity_id);
    }

    pub fn set_branding(&self, branding: Branding) {
        let organization_id = branding.organization_id.expect("branding needs an organization");
        self.branding.lock().insert(organization_id, branding);
    }

    pub fn set_flag(&self, organization_id: Uuid, feature_name: &str, is_enabled: bool) {
        self.flags.lock().push(FeatureFlag {
            organization_id,
            feature_name: feature_name.into(),
            is_enabled,
        });
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// The next `current_identity` call snapshots the identity, then
    /// waits until the returned handle is notified.
    pub fn gate_next_identity_read(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.identity_gate.lock() = Some(gate.clone());
        gate
    }

    /// Number of directory reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check(&self) -> OrgscopeResult<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(OrgscopeError::Database("connection refused".into()));
        }
        Ok(())
    }
}

impl SessionDirectory for FakeDirectory {
    async fn current_identity(&self) -> OrgscopeResult<Option<Identity>> {
        self.check()?;
        let identity = self.identity.lock().clone();
        let gate = self.identity_gate.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(identity)
    }

    async fn get_role_assignment(&self, identity_id: Uuid) -> OrgscopeResult<Option<RoleAssignment>> {
        self.check()?;
        Ok(self.assignments.lock().get(&identity_id).cloned())
    }

    async fn get_organization(&self, id: Uuid) -> OrgscopeResult<Option<Organization>> {
        self.check()?;
        Ok(self.organizations.lock().get(&id).cloned())
    }

    async fn get_branding(&self, organization_id: Uuid) -> OrgscopeResult<Option<Branding>> {
        self.check()?;
        Ok(self.branding.lock().get(&organization_id).cloned())
    }

    async fn list_feature_flags(&self, organization_id: Uuid) -> OrgscopeResult<Vec<FeatureFlag>> {
        self.check()?;
        Ok(self
            .flags
            .lock()
            .iter()
            .filter(|f| f.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn sign_out(&self) -> OrgscopeResult<()> {
        self.identity.lock().take();
        Ok(())
    }
}

pub type TestSession = TenantSession<FakeDirectory, MemoryImpersonationStore>;

pub struct Fixture {
    pub directory: Arc<FakeDirectory>,
    pub store: Arc<MemoryImpersonationStore>,
    pub session: TestSession,
}

pub fn fixture() -> Fixture {
    let directory = Arc::new(FakeDirectory::new());
    let store = Arc::new(MemoryImpersonationStore::new());
    let session = TenantSession::new(directory.clone(), store.clone(), ContextConfig::default());
    Fixture {
        directory,
        store,
        session,
    }
}

/// A signed-in platform admin with no organization of their own.
pub fn signed_in_admin(fixture: &Fixture) -> Uuid {
    let admin_id = Uuid::new_v4();
    fixture.directory.sign_in(admin_id);
    fixture.directory.assign(admin_id, None, Role::Admin);
    admin_id
}
