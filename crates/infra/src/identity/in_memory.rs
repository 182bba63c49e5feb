use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use campus_auth::{AuthError, Credential, Identity};
use campus_core::UserId;
use campus_events::{EventBus, InMemoryEventBus, Subscription};

use super::r#trait::IdentityProvider;
use crate::connectivity::Connectivity;

#[derive(Clone)]
struct Account {
    identity: Identity,
    password: String,
}

impl core::fmt::Debug for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Account")
            .field("identity", &self.identity)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// In-memory identity provider.
///
/// Intended for tests/dev. Passwords are compared verbatim; there is no
/// hashing and nothing is persisted.
///
/// Lock order: `current` before the change bus, so a subscriber's seeded
/// identity and the changes that follow never interleave.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<Identity>>,
    changes: InMemoryEventBus<Option<Identity>>,
    connectivity: Connectivity,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account without signing it in.
    pub fn seed_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let mut accounts = self.accounts.lock().map_err(|_| poisoned())?;
        let key = normalize_email(email);
        if accounts.contains_key(&key) {
            return Err(AuthError::AccountExists);
        }

        let identity = Identity::new(UserId::new(), key.clone());
        accounts.insert(
            key,
            Account {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );
        Ok(identity)
    }

    /// Change the signed-in identity from the provider's side (e.g. a session
    /// restored from storage, or revoked).
    pub fn set_current(&self, identity: Option<Identity>) -> Result<(), AuthError> {
        self.switch_to(identity)
    }

    pub fn current(&self) -> Option<Identity> {
        self.current.lock().ok().and_then(|c| c.clone())
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Number of live identity-changed subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.changes.subscriber_count()
    }

    fn switch_to(&self, identity: Option<Identity>) -> Result<(), AuthError> {
        let mut current = self.current.lock().map_err(|_| poisoned())?;
        *current = identity.clone();
        self.changes
            .publish(identity)
            .map_err(|e| AuthError::Unknown(format!("{e}")))
    }

    fn require_online(&self) -> Result<(), AuthError> {
        self.connectivity
            .require_online()
            .map_err(|e| AuthError::Network(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn login(&self, credential: &Credential) -> Result<Identity, AuthError> {
        self.require_online()?;

        let account = {
            let accounts = self.accounts.lock().map_err(|_| poisoned())?;
            accounts.get(&normalize_email(&credential.email)).cloned()
        };

        match account {
            Some(account) if account.password == credential.password => {
                self.switch_to(Some(account.identity.clone()))?;
                Ok(account.identity)
            }
            _ => Err(AuthError::InvalidCredential),
        }
    }

    async fn register(&self, credential: &Credential) -> Result<Identity, AuthError> {
        self.require_online()?;

        let identity = self.seed_account(&credential.email, &credential.password)?;
        self.switch_to(Some(identity.clone()))?;
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.require_online()?;

        let signed_in = self.current.lock().map_err(|_| poisoned())?.is_some();
        if signed_in {
            self.switch_to(None)?;
        }
        Ok(())
    }

    fn subscribe(&self) -> Subscription<Option<Identity>> {
        match self.current.lock() {
            Ok(current) => self.changes.subscribe_seeded(current.clone()),
            Err(_) => self.changes.subscribe_seeded(None),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn poisoned() -> AuthError {
    AuthError::Unknown("identity provider lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Credential {
        Credential::new("jane@univ.edu", "pw")
    }

    #[tokio::test]
    async fn subscription_starts_with_current_identity() {
        let provider = InMemoryIdentityProvider::new();
        let mut signed_out = provider.subscribe();
        assert_eq!(signed_out.recv().await, Some(None));

        provider.seed_account("jane@univ.edu", "pw").unwrap();
        let identity = provider.login(&jane()).await.unwrap();

        let mut late = provider.subscribe();
        assert_eq!(late.recv().await, Some(Some(identity.clone())));
        assert_eq!(signed_out.recv().await, Some(Some(identity)));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email() {
        let provider = InMemoryIdentityProvider::new();
        provider.seed_account("jane@univ.edu", "pw").unwrap();

        let wrong = Credential::new("jane@univ.edu", "nope");
        assert_eq!(provider.login(&wrong).await, Err(AuthError::InvalidCredential));

        let unknown = Credential::new("sam@univ.edu", "pw");
        assert_eq!(provider.login(&unknown).await, Err(AuthError::InvalidCredential));
        assert_eq!(provider.current(), None);
    }

    #[tokio::test]
    async fn email_match_ignores_case() {
        let provider = InMemoryIdentityProvider::new();
        provider.seed_account("Jane@Univ.edu", "pw").unwrap();
        assert!(provider.login(&jane()).await.is_ok());
    }

    #[tokio::test]
    async fn register_signs_in_and_rejects_duplicates() {
        let provider = InMemoryIdentityProvider::new();
        let identity = provider.register(&jane()).await.unwrap();
        assert_eq!(provider.current(), Some(identity));

        assert_eq!(provider.register(&jane()).await, Err(AuthError::AccountExists));
    }

    #[tokio::test]
    async fn logout_publishes_only_on_change() {
        let provider = InMemoryIdentityProvider::new();
        provider.seed_account("jane@univ.edu", "pw").unwrap();
        provider.login(&jane()).await.unwrap();

        let mut sub = provider.subscribe();
        sub.recv().await.unwrap();

        provider.logout().await.unwrap();
        provider.logout().await.unwrap();

        assert_eq!(sub.try_recv(), Ok(None));
        assert!(sub.try_recv().is_err());
    }

    #[tokio::test]
    async fn offline_provider_reports_network_errors() {
        let provider = InMemoryIdentityProvider::new();
        provider.seed_account("jane@univ.edu", "pw").unwrap();
        provider.connectivity().set_offline();

        assert!(matches!(provider.login(&jane()).await, Err(AuthError::Network(_))));
        assert!(matches!(provider.logout().await, Err(AuthError::Network(_))));
    }

    #[test]
    fn dropped_subscriptions_are_not_counted() {
        let provider = InMemoryIdentityProvider::new();
        let sub = provider.subscribe();
        assert_eq!(provider.subscriber_count(), 1);
        drop(sub);
        assert_eq!(provider.subscriber_count(), 0);
    }

    #[test]
    fn debug_output_hides_stored_passwords() {
        let provider = InMemoryIdentityProvider::new();
        provider.seed_account("jane@univ.edu", "hunter2").unwrap();

        let rendered = format!("{provider:?}");
        assert!(rendered.contains("jane@univ.edu"));
        assert!(!rendered.contains("hunter2"));
    }
}
