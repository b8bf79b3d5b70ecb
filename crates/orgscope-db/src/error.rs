//! Database-specific error types and conversions.

use orgscope_core::error::OrgscopeError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed {entity} record: {message}")]
    InvalidRecord { entity: String, message: String },

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for OrgscopeError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OrgscopeError::NotFound { entity, id },
            other => OrgscopeError::Database(other.to_string()),
        }
    }
}
