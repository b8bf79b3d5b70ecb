//! Identity domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal of the current session.
///
/// Supplied by the directory and immutable for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: Uuid) -> Self {
        Self { id, email: None }
    }
}
