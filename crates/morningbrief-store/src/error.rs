use thiserror::Error;

/// Errors that can occur within the preference store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The supplied preference violates a field constraint.
    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    /// No record exists for the given chat identity.
    #[error("Preference not found: {chat_id}")]
    NotFound { chat_id: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
