use thiserror::Error;

use campus_auth::{AuthError, WriteError};

/// Failure of [`crate::SessionController::register`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The identity provider refused to create the account.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The account exists but its initial profile could not be written.
    #[error("account created but profile could not be saved: {0}")]
    Profile(#[source] WriteError),
}
