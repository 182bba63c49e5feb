//! Error taxonomy for identity and store operations.

use thiserror::Error;

use campus_core::UserId;

/// Failure of an identity-provider operation (login, register, logout).
///
/// Returned to the caller (e.g. shown inline in the sign-in form); never
/// folded into the session state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredential,

    #[error("an account with this email already exists")]
    AccountExists,

    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Unknown(String),
}

/// Failure to resolve a profile for a signed-in identity.
///
/// Absorbed into the session state as "no profile"; logged, never raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileFetchError {
    #[error("no profile stored for {0}")]
    NotFound(UserId),

    #[error("network error: {0}")]
    Network(String),
}

/// Failure of a document-store write (profile or course).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Failure of a document-store read other than a profile lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("network error: {0}")]
    Network(String),
}
