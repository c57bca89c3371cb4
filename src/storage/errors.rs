use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] rusqlite::Error),

    #[error("Migration {version} failed: {message}")]
    MigrationFailed { version: i32, message: String },

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error ({context}): {source}")]
    SerializationError {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database path error: {0}")]
    DatabasePathError(String),
}

impl StorageError {
    pub fn migration_failed(version: i32, message: impl Into<String>) -> Self {
        StorageError::MigrationFailed {
            version,
            message: message.into(),
        }
    }

    pub fn game_not_found(game_id: &str) -> Self {
        StorageError::GameNotFound(game_id.to_string())
    }

    pub fn serialization_error(context: &str, source: serde_json::Error) -> Self {
        StorageError::SerializationError {
            context: context.to_string(),
            source,
        }
    }

    pub fn database_path_error(message: impl Into<String>) -> Self {
        StorageError::DatabasePathError(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        StorageError::InvalidData(message.into())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
