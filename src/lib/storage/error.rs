use thiserror::Error;

use crate::core::TodoError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Backend is not configured")]
    Unconfigured,
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Backend responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed row: {0}")]
    MalformedRow(String),
}

impl StorageError {
    /// The storage failure wrapped in `err`, if there is one.
    pub fn cause_of(err: &TodoError) -> Option<&StorageError> {
        match err {
            TodoError::Storage(source) => source.downcast_ref::<StorageError>(),
            _ => None,
        }
    }
}

impl From<StorageError> for TodoError {
    fn from(err: StorageError) -> Self {
        TodoError::Storage(Box::new(err))
    }
}
