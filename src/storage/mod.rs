//! SQLite archive of finished games and recorded positions

pub mod database;
pub mod errors;
pub mod games;
pub mod models;
pub mod positions;
pub mod schema;

// Re-export key types for easy access
pub use database::Archive;
pub use errors::StorageError;
pub use models::{ArchivedGame, NewArchivedGame, RecordedPosition};
