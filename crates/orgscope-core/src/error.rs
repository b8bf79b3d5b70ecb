//! Error types for the orgscope system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgscopeError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type OrgscopeResult<T> = Result<T, OrgscopeError>;
