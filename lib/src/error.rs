/// Error type for the profile export/import subsystem
///
/// Every variant is recoverable: the session that produced it is left in a
/// well-defined state and the user can correct the input and retry.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Bad export selection or file name
    #[error("Invalid export: {0}")]
    Validation(String),

    /// Wrong password or corrupted encrypted artifact
    #[error("Decryption failed: wrong password or corrupted file")]
    DecryptionFailure,

    #[error("The selected file is empty")]
    EmptyFile,

    /// Neither JSON nor an encrypted artifact
    #[error("Unsupported file format: the file is neither a plain nor an encrypted profile export")]
    UnsupportedFormat,

    /// The structural validator found no usable object
    #[error("The file is not a recognized profile export")]
    NotRecognizedExport,

    /// Apply was requested without any destination enabled
    #[error("Nothing selected: choose at least one destination to import into")]
    NothingSelected,

    /// The merge was computed but the store could not save it
    #[error("Failed to save imported data: {0}")]
    PersistFailed(String),

    /// Another export or import holds the session lock
    #[error("Another export or import is already in progress")]
    Busy,

    #[error("Operation not allowed while the import session is {0}")]
    InvalidState(String),

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    /// Database-related errors (SQLite)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors (artifact files, config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    /// Unreadable configuration file
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using ProfileError
pub type Result<T> = std::result::Result<T, ProfileError>;

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for ProfileError {
    fn from(err: serde_yaml::Error) -> Self {
        ProfileError::Yaml(err.to_string())
    }
}
