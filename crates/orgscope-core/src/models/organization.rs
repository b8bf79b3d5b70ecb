//! Organization domain model.
//!
//! Organizations are the unit of data isolation: nearly every dashboard
//! view is scoped to exactly one of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationStatus {
    Active,
    Inactive,
    Suspended,
}

impl OrganizationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrganizationStatus::Active => "active",
            OrganizationStatus::Inactive => "inactive",
            OrganizationStatus::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for OrganizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrganizationStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(OrganizationStatus::Active),
            "inactive" => Ok(OrganizationStatus::Inactive),
            "suspended" => Ok(OrganizationStatus::Suspended),
            _ => Err(()),
        }
    }
}

/// A client organization (tenant), owned by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub status: OrganizationStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields required to provision a new organization in a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub status: Option<OrganizationStatus>,
}

#[cfg(test)]
mod tests {
    use super::OrganizationStatus;

    #[test]
    fn status_string_roundtrip() {
        for status in [
            OrganizationStatus::Active,
            OrganizationStatus::Inactive,
            OrganizationStatus::Suspended,
        ] {
            assert_eq!(status.as_str().parse::<OrganizationStatus>(), Ok(status));
        }
        assert!("archived".parse::<OrganizationStatus>().is_err());
    }
}
