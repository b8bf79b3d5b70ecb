//! SurrealDB repository implementations.

mod directory;

pub use directory::SurrealSessionDirectory;
