use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Storage(#[from] storage::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_cause(error: &Error) -> &'static str {
        match error {
            Error::Authentication(_) | Error::InvalidState(_) => "none",
            Error::Storage(storage::Error::Database(_)) => "database",
            Error::Storage(storage::Error::Serialization(_)) => "serialization",
            Error::Storage(storage::Error::UnknownEventType(_)) => "event type",
        }
    }

    #[test]
    fn test_storage_errors_match_exhaustively() {
        let error = Error::from(storage::Error::UnknownEventType("Picnic".to_string()));
        assert_eq!(storage_cause(&error), "event type");
        assert_eq!(error.to_string(), "unknown event type: Picnic");
        assert_eq!(storage_cause(&Error::InvalidState("settling".to_string())), "none");
    }
}
