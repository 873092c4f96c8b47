use pocketledger_core::StorageError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Rejection of a session operation.
///
/// The `Display` text of the first two variants is meant to be shown to the
/// user as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists")]
    DuplicateIdentity { email: String },

    #[error("Invalid email or password")]
    UnknownIdentity { email: String },

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}
