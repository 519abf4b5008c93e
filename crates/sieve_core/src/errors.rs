use thiserror::Error;

#[derive(Debug, Error)]
pub enum SieveError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Persist: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Bitmap is {actual} bytes, expected {expected}")]
    BitmapLength { expected: usize, actual: usize },

    #[error("Invalid wire structure: {0}")]
    InvalidWire(String),
}

impl SieveError {
    /// True for every way a serialized filter can be rejected.
    pub fn is_malformed_wire(&self) -> bool {
        matches!(
            self,
            SieveError::Json(_)
                | SieveError::Base64(_)
                | SieveError::BitmapLength { .. }
                | SieveError::InvalidWire(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SieveError>;
