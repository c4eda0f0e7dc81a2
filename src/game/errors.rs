use thiserror::Error;

/// Errors that can arise inside the game engines and the save layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around IO errors (save directory creation, file access).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around serde_json serialization and deserialization errors.
    #[error("save serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when loading and no save file exists.
    #[error("no saved adventure found at {0}")]
    NoSaveFile(String),

    /// Returned when a save document parses but fails validation.
    #[error("invalid save data: {0}")]
    InvalidSave(String),

    /// Returned when a save document's version has no migration path.
    #[error("unsupported save version {found} (current {current})")]
    MigrationUnsupported { found: f64, current: f64 },

    /// Referenced a room id that is not in the world.
    #[error("unknown room: {0}")]
    UnknownRoom(String),

    /// Referenced an enemy template that is not in the catalog.
    #[error("unknown enemy: {0}")]
    UnknownEnemy(String),

    /// Internal error (channel closed, unexpected conditions).
    #[error("internal error: {0}")]
    Internal(String),
}
