use thiserror::Error;

/// Authentication and authorization failures.
///
/// Display strings are the messages returned to HTTP callers.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unauthorized")]
    AuthenticationRequired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Access denied to business")]
    PermissionDenied,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
