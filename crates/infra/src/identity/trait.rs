use async_trait::async_trait;

use campus_auth::{AuthError, Credential, Identity};
use campus_events::Subscription;

/// Remote identity provider, consumed as an opaque capability.
///
/// Password checks, token issuance and session persistence all happen on the
/// provider's side. The application only learns *who* is signed in, through
/// the identity-changed stream.
///
/// ## Identity-changed stream
///
/// [`IdentityProvider::subscribe`] delivers the provider's current identity
/// first (`None` when signed out), then every subsequent change, in order.
/// Successful `login`/`register`/`logout` calls are reflected on the stream;
/// so are changes the provider makes on its own (e.g. an expired session).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn login(&self, credential: &Credential) -> Result<Identity, AuthError>;

    /// Create an account and sign it in.
    async fn register(&self, credential: &Credential) -> Result<Identity, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    fn subscribe(&self) -> Subscription<Option<Identity>>;
}
