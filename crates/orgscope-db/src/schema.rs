//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings; enums are stored as their snake_case names with ASSERT
//! constraints where the set is closed.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "directory_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: directory tables
// -----------------------------------------------------------------------

// Role names are not ASSERTed; unrecognized names resolve as `unknown`.
const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (tenants)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD industry ON TABLE organization TYPE option<string>;
DEFINE FIELD website ON TABLE organization TYPE option<string>;
DEFINE FIELD status ON TABLE organization TYPE string \
    ASSERT $value IN ['active', 'inactive', 'suspended'];
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Role assignments (one active assignment per identity, keyed by it)
-- =======================================================================
DEFINE TABLE role_assignment SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE role_assignment \
    TYPE option<string>;
DEFINE FIELD role ON TABLE role_assignment TYPE string;
DEFINE FIELD updated_at ON TABLE role_assignment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_assignment_org ON TABLE role_assignment \
    COLUMNS organization_id;

-- =======================================================================
-- Branding (one-to-one with organization, keyed by it)
-- =======================================================================
DEFINE TABLE branding SCHEMAFULL;
DEFINE FIELD primary_color ON TABLE branding TYPE string;
DEFINE FIELD secondary_color ON TABLE branding TYPE string;
DEFINE FIELD accent_color ON TABLE branding TYPE string;
DEFINE FIELD logo_url ON TABLE branding TYPE option<string>;
DEFINE FIELD custom_css ON TABLE branding TYPE option<string>;

-- =======================================================================
-- Feature flags (many-to-one with organization)
-- =======================================================================
DEFINE TABLE feature_flag SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE feature_flag TYPE string;
DEFINE FIELD feature_name ON TABLE feature_flag TYPE string;
DEFINE FIELD is_enabled ON TABLE feature_flag TYPE bool DEFAULT true;
DEFINE INDEX idx_feature_flag_org_name ON TABLE feature_flag \
    COLUMNS organization_id, feature_name UNIQUE;
";

/// Run all pending migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_defines_directory_tables() {
        for table in ["organization", "role_assignment", "branding", "feature_flag"] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} SCHEMAFULL")),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
