use std::error::Error as StdError;

use thiserror::Error;

/// Backend failures are kept opaque here; `storage` decides what goes inside.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Todo with ID '{0}' not found.")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_keep_their_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "backend timed out");
        let err = TodoError::Storage(Box::new(io));
        assert_eq!(err.to_string(), "Storage error: backend timed out");
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }
}
