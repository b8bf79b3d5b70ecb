use std::path::PathBuf;

use anyhow::{Context, Result};
use orgscope_context::ContextConfig;
use orgscope_db::DbConfig;
use uuid::Uuid;

// Inspector configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub db: DbConfig,
    pub context: ContextConfig,
    pub identity_id: Option<Uuid>,
    pub session_file: PathBuf,
}

fn var_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

impl InspectConfig {
    pub fn from_env() -> Result<Self> {
        let db_defaults = DbConfig::default();
        let db = DbConfig {
            url: var_or("ORGSCOPE_DB_URL", db_defaults.url),
            namespace: var_or("ORGSCOPE_DB_NAMESPACE", db_defaults.namespace),
            database: var_or("ORGSCOPE_DB_DATABASE", db_defaults.database),
            username: var_or("ORGSCOPE_DB_USERNAME", db_defaults.username),
            password: var_or("ORGSCOPE_DB_PASSWORD", db_defaults.password),
        };

        let ctx_defaults = ContextConfig::default();
        let context = ContextConfig {
            root_path: var_or("ORGSCOPE_ROOT_PATH", ctx_defaults.root_path),
            admin_path: var_or("ORGSCOPE_ADMIN_PATH", ctx_defaults.admin_path),
            login_path: var_or("ORGSCOPE_LOGIN_PATH", ctx_defaults.login_path),
            onboarding_path: var_or("ORGSCOPE_ONBOARDING_PATH", ctx_defaults.onboarding_path),
        };

        let identity_id = std::env::var("ORGSCOPE_IDENTITY_ID")
            .ok()
            .map(|raw| raw.parse::<Uuid>())
            .transpose()
            .with_context(|| "parse ORGSCOPE_IDENTITY_ID")?;

        let session_file = std::env::var("ORGSCOPE_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("orgscope-impersonation.json"));

        Ok(Self {
            db,
            context,
            identity_id,
            session_file,
        })
    }
}
