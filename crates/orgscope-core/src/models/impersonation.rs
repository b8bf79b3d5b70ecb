//! Impersonation session model.
//!
//! An admin "viewing as" a client organization is recorded locally, not in
//! the directory. The record is only trustworthy while its acting identity
//! matches the live identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All four fields are written and cleared as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpersonationSession {
    #[serde(rename = "impersonating_org_id")]
    pub target_organization_id: Uuid,
    #[serde(rename = "impersonating_admin_id")]
    pub acting_identity_id: Uuid,
    #[serde(rename = "impersonating_org_name")]
    pub target_organization_name: String,
    #[serde(rename = "impersonation_return_path")]
    pub return_path: String,
}

impl ImpersonationSession {
    /// Whether this session belongs to the given live identity.
    pub fn is_valid_for(&self, identity_id: Uuid) -> bool {
        self.acting_identity_id == identity_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_under_persisted_keys() {
        let session = ImpersonationSession {
            target_organization_id: Uuid::new_v4(),
            acting_identity_id: Uuid::new_v4(),
            target_organization_name: "Acme".into(),
            return_path: "/admin/organizations".into(),
        };
        let value = serde_json::to_value(&session).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "impersonating_org_id",
            "impersonating_admin_id",
            "impersonating_org_name",
            "impersonation_return_path",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(object.len(), 4);
    }

    #[test]
    fn validity_requires_matching_identity() {
        let admin = Uuid::new_v4();
        let session = ImpersonationSession {
            target_organization_id: Uuid::new_v4(),
            acting_identity_id: admin,
            target_organization_name: "Acme".into(),
            return_path: "/admin".into(),
        };
        assert!(session.is_valid_for(admin));
        assert!(!session.is_valid_for(Uuid::new_v4()));
    }
}
