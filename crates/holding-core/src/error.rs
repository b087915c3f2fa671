use thiserror::Error;

#[derive(Debug, Error)]
pub enum HoldingError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for HoldingError {
    fn from(e: serde_json::Error) -> Self {
        HoldingError::SerializationError(e.to_string())
    }
}
