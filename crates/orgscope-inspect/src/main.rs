//! orgscope inspector: resolve and print the tenant context for an
//! identity against a live directory database.
//!
//! ```text
//! orgscope-inspect                     resolve and print the context
//! orgscope-inspect impersonate <org>   start impersonating an organization
//! orgscope-inspect end                 stop impersonating
//! ```

mod config;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use orgscope_context::{FileImpersonationStore, TenantSession};
use orgscope_core::directory::SessionDirectory;
use orgscope_core::models::identity::Identity;
use orgscope_db::{DbManager, SurrealSessionDirectory};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::InspectConfig;

enum Command {
    Resolve,
    Impersonate(Uuid),
    End,
}

fn parse_command(mut args: impl Iterator<Item = String>) -> Result<Command> {
    match args.next().as_deref() {
        None | Some("resolve") => Ok(Command::Resolve),
        Some("impersonate") => {
            let raw = args
                .next()
                .with_context(|| "impersonate requires an organization id")?;
            let id = raw
                .parse()
                .with_context(|| format!("parse organization id: {raw}"))?;
            Ok(Command::Impersonate(id))
        }
        Some("end") => Ok(Command::End),
        Some(other) => bail!("unknown command: {other}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("orgscope=info".parse()?))
        .json()
        .init();

    let command = parse_command(std::env::args().skip(1))?;
    let config = InspectConfig::from_env()?;

    let manager = DbManager::connect(&config.db)
        .await
        .with_context(|| format!("connect to {}", config.db.url))?;
    orgscope_db::run_migrations(manager.client())
        .await
        .with_context(|| "apply directory schema")?;

    let directory = Arc::new(SurrealSessionDirectory::new(manager.client().clone()));
    if let Some(identity_id) = config.identity_id {
        directory.sign_in(Identity::new(identity_id));
    }
    let store = Arc::new(FileImpersonationStore::new(&config.session_file));
    info!(session_file = %config.session_file.display(), "Using impersonation session file");

    let session = TenantSession::new(directory.clone(), store, config.context.clone());
    session.refresh().await;

    match command {
        Command::Resolve => {}
        Command::Impersonate(organization_id) => {
            let organization = directory
                .get_organization(organization_id)
                .await?
                .with_context(|| format!("organization {organization_id} not found"))?;
            let navigation = session.begin_impersonating(&organization, &config.context.admin_path)?;
            session.navigate(navigation.target()).await;
        }
        Command::End => {
            let navigation = session.end_impersonating().await?;
            info!(return_path = navigation.target(), "Impersonation ended");
        }
    }

    let context = session.context();
    if let Some(route) = context
        .error
        .as_ref()
        .and_then(|e| config.context.route_for_error(e))
    {
        info!(route, "Context requires redirect");
    }
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn commands_parse() {
        assert!(matches!(parse_command(args(&[])), Ok(Command::Resolve)));
        assert!(matches!(parse_command(args(&["end"])), Ok(Command::End)));

        let id = Uuid::new_v4();
        let parsed = parse_command(args(&["impersonate", &id.to_string()])).unwrap();
        assert!(matches!(parsed, Command::Impersonate(got) if got == id));

        assert!(parse_command(args(&["impersonate"])).is_err());
        assert!(parse_command(args(&["impersonate", "not-a-uuid"])).is_err());
        assert!(parse_command(args(&["frobnicate"])).is_err());
    }
}
