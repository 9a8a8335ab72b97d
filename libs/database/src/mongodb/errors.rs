use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server code for a unique index violation
const DUPLICATE_KEY_CODE: i32 = 11000;

/// How a driver error should surface to API callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// No server reachable: selection timed out, network failure, or the pool
    /// was cleared after a connection error
    Unavailable,
    /// A unique index rejected the write
    DuplicateKey,
    /// Anything else the server or driver reported
    Other,
}

/// Classify a driver error for mapping onto HTTP statuses.
pub fn classify(err: &Error) -> StoreErrorKind {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. } => StoreErrorKind::Unavailable,
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            StoreErrorKind::DuplicateKey
        }
        _ => StoreErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_errors_are_unavailable() {
        let err = Error::from(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert_eq!(classify(&err), StoreErrorKind::Unavailable);
    }

    #[test]
    fn test_custom_errors_are_other() {
        let err = Error::custom("unexpected reply");
        assert_eq!(classify(&err), StoreErrorKind::Other);
    }
}
