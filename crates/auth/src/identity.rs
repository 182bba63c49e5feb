use serde::{Deserialize, Serialize};

use campus_core::UserId;

/// Identity of a signed-in principal, as issued by the identity provider.
///
/// Opaque to the rest of the application: only the provider constructs it.
/// `key` is stable for the lifetime of the account and keys the profile
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    key: UserId,
    email: String,
}

impl Identity {
    pub fn new(key: UserId, email: impl Into<String>) -> Self {
        Self {
            key,
            email: email.into(),
        }
    }

    pub fn key(&self) -> UserId {
        self.key
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl core::fmt::Display for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} <{}>", self.key, self.email)
    }
}

/// Email/password pair handed through to the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
