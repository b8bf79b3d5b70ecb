//! orgscope Database: SurrealDB connection management and the
//! directory adapter behind the tenant context resolver.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - The [`SurrealSessionDirectory`] implementation of
//!   `orgscope_core::directory::SessionDirectory`
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::SurrealSessionDirectory;
pub use schema::{run_migrations, schema_v1};
