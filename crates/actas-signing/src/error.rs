//! Error taxonomy for the signature workflow
//!
//! Every failure surfaces synchronously with the operation result; the one
//! exception is per-attendee delivery failure during request issuance,
//! which is aggregated into the outcome instead of aborting the call.

use actas_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by signature workflow operations.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Required input missing or malformed; caller-fixable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No requester identity present.
    #[error("caller is not authenticated")]
    Unauthenticated,

    /// Caller lacks rights over the target acta, or a token mismatched.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Acta or attendee does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Recording a signature for an already-signed attendee.
    #[error("attendee has already signed")]
    AlreadySigned,

    /// Unexpected storage failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for SigningError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => SigningError::NotFound(msg),
            other => SigningError::Internal(other.to_string()),
        }
    }
}

/// Result type alias for workflow operations.
pub type SigningResult<T> = Result<T, SigningError>;
