//! Session state controller.
//!
//! ## State machine
//!
//! ```text
//!               initialize()
//!   (created) ───────────────► Pending {None, None, loading}
//!                                   │ identity event
//!            ┌──────────────────────┼───────────────────────┐
//!            ▼ None                 ▼ Some(id)              │
//!   SignedOut {None, None, -}   Resolving {id, None, loading}
//!                                   │ profile lookup settles (same generation)
//!                                   ▼
//!                          Resolved {id, profile | None, -}
//! ```
//!
//! Every identity event bumps a generation counter. A profile lookup is tagged
//! with the generation it was started for and commits only if that generation
//! is still current and the controller still holds the same identity;
//! otherwise the result is dropped. Lookups are never aborted.
//!
//! ## Publication
//!
//! The state lives behind one mutex. Each change replaces the whole triple and
//! is published to observers while the mutex is held, so observers see whole
//! triples, in commit order. `login`, `register` and `logout` never touch the
//! state: the identity-changed stream is its only writer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use campus_auth::{
    AccessGate, AccessPolicy, AuthError, Credential, GateOutcome, Identity, Profile,
    ProfileFetchError, Registration, SessionState,
};
use campus_events::{EventBus, InMemoryEventBus, Subscription};
use campus_infra::{IdentityProvider, ProfileStore};

use crate::{RegisterError, SessionConfig};

/// Process-wide owner of the session triple.
///
/// Create one per application, call [`SessionController::initialize`] at
/// launch and [`SessionController::teardown`] at shutdown.
pub struct SessionController {
    shared: Arc<Shared>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn ProfileStore>,
    config: SessionConfig,
    inner: Mutex<Inner>,
    observers: InMemoryEventBus<SessionState>,
}

struct Inner {
    state: SessionState,
    generation: u64,
    /// Registrations between provider account creation and profile write.
    registering: usize,
    /// Identity seen while a registration was in flight; resolved once it ends.
    deferred: Option<(u64, Identity)>,
    last_profile_error: Option<ProfileFetchError>,
}

impl SessionController {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn ProfileStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                provider,
                store,
                config,
                inner: Mutex::new(Inner {
                    state: SessionState::pending(),
                    generation: 0,
                    registering: 0,
                    deferred: None,
                    last_profile_error: None,
                }),
                observers: InMemoryEventBus::new(),
            }),
            listener: Mutex::new(None),
        }
    }

    /// Subscribe to the identity provider and start resolving sessions.
    ///
    /// Sets `loading` immediately. Returns `false` (and does nothing) if the
    /// controller is already subscribed, or if called outside a tokio runtime.
    pub fn initialize(&self) -> bool {
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        if listener.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::warn!("session controller already initialized; ignoring");
            return false;
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::error!("session controller must be initialized inside a tokio runtime");
            return false;
        };

        {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            inner.deferred = None;
            self.shared.commit(&mut inner, SessionState::pending());
        }

        let mut changes = self.shared.provider.subscribe();
        let shared = Arc::clone(&self.shared);
        *listener = Some(runtime.spawn(async move {
            while let Some(identity) = changes.recv().await {
                shared.on_identity_changed(identity);
            }
            tracing::info!("identity stream closed");
        }));

        tracing::info!("session controller initialized");
        true
    }

    /// Unsubscribe from the identity provider.
    ///
    /// The provider subscription is gone when this returns. Lookups still in
    /// flight are invalidated. Safe to call repeatedly, and before
    /// [`SessionController::initialize`].
    pub async fn teardown(&self) {
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(handle) = handle else {
            tracing::debug!("session controller teardown: not initialized");
            return;
        };

        handle.abort();
        // The subscription is owned by the task; awaiting guarantees it was dropped.
        let _ = handle.await;

        let mut inner = self.shared.lock();
        inner.generation += 1;
        inner.deferred = None;
        tracing::info!("session controller torn down");
    }

    pub fn is_initialized(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Current session triple.
    pub fn state(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    /// Receive every session triple published from now on.
    pub fn subscribe(&self) -> Subscription<SessionState> {
        self.shared.observers.subscribe()
    }

    /// Current triple plus a subscription to every later one, taken atomically.
    pub fn watch(&self) -> (SessionState, Subscription<SessionState>) {
        let inner = self.shared.lock();
        let subscription = self.shared.observers.subscribe();
        (inner.state.clone(), subscription)
    }

    /// The most recent profile lookup failure for the current identity.
    pub fn last_profile_error(&self) -> Option<ProfileFetchError> {
        self.shared.lock().last_profile_error.clone()
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.shared.config.routes.clone())
    }

    /// Evaluate a route policy against the current triple.
    pub fn authorize(&self, policy: &AccessPolicy, requested: &str) -> GateOutcome {
        self.gate().evaluate(&self.state(), policy, requested)
    }

    /// Sign in through the identity provider.
    ///
    /// The session triple follows through the identity-changed stream.
    pub async fn login(&self, credential: &Credential) -> Result<Identity, AuthError> {
        match self.shared.provider.login(credential).await {
            Ok(identity) => {
                tracing::info!(user = %identity.key(), "login succeeded");
                Ok(identity)
            }
            Err(e) => {
                tracing::info!(email = %credential.email, error = %e, "login failed");
                Err(e)
            }
        }
    }

    /// Create an account and its initial profile.
    ///
    /// Resolution of the new identity waits until the profile write has
    /// finished, so a brand-new user is never observed without a profile just
    /// because the lookup won the race against the write.
    pub async fn register(
        &self,
        credential: &Credential,
        registration: &Registration,
    ) -> Result<Identity, RegisterError> {
        let _guard = RegistrationGuard::begin(&self.shared);

        let identity = self.shared.provider.register(credential).await?;
        tracing::info!(user = %identity.key(), role = %registration.role, "account registered");

        let profile = Profile::for_identity(&identity, registration);
        if let Err(e) = self.shared.store.put_profile(profile).await {
            tracing::warn!(user = %identity.key(), error = %e, "initial profile write failed");
            return Err(RegisterError::Profile(e));
        }

        Ok(identity)
    }

    /// Sign out through the identity provider.
    ///
    /// On failure the triple is left unchanged.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.shared.provider.logout().await.inspect_err(|e| {
            tracing::warn!(error = %e, "logout failed; session unchanged");
        })
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        let listener = self.listener.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = listener.take() {
            handle.abort();
        }
    }
}

impl core::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every commit replaces the triple whole, so a poisoned guard still
        // holds a consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self, inner: &mut Inner, next: SessionState) {
        tracing::debug!(
            identity = ?next.identity().map(|i| i.key()),
            role = ?next.role(),
            loading = next.is_loading(),
            "session state"
        );
        inner.state = next.clone();
        if let Err(e) = self.observers.publish(next) {
            tracing::warn!(error = ?e, "failed to notify session observers");
        }
    }

    fn on_identity_changed(self: &Arc<Self>, identity: Option<Identity>) {
        let mut inner = self.lock();
        inner.generation += 1;
        let generation = inner.generation;
        inner.deferred = None;
        inner.last_profile_error = None;

        let Some(identity) = identity else {
            self.commit(&mut inner, SessionState::signed_out());
            return;
        };

        self.commit(&mut inner, SessionState::resolving(identity.clone()));

        if inner.registering > 0 {
            tracing::debug!(user = %identity.key(), "registration in flight; deferring profile lookup");
            inner.deferred = Some((generation, identity));
            return;
        }

        drop(inner);
        self.spawn_lookup(generation, identity);
    }

    fn spawn_lookup(self: &Arc<Self>, generation: u64, identity: Identity) {
        let Ok(runtime) = Handle::try_current() else {
            tracing::error!(user = %identity.key(), "no runtime to resolve profile on");
            return;
        };

        let shared = Arc::clone(self);
        runtime.spawn(async move {
            let result = shared.fetch_profile(&identity).await;
            shared.finish_lookup(generation, identity, result);
        });
    }

    async fn fetch_profile(&self, identity: &Identity) -> Result<Profile, ProfileFetchError> {
        let lookup = self.store.get_profile(identity.key());
        match self.config.profile_fetch_timeout {
            None => lookup.await,
            Some(limit) => tokio::time::timeout(limit, lookup).await.unwrap_or_else(|_| {
                Err(ProfileFetchError::Network(format!(
                    "profile lookup timed out after {}ms",
                    limit.as_millis()
                )))
            }),
        }
    }

    fn finish_lookup(
        &self,
        generation: u64,
        identity: Identity,
        result: Result<Profile, ProfileFetchError>,
    ) {
        let mut inner = self.lock();
        if inner.generation != generation || inner.state.identity() != Some(&identity) {
            tracing::debug!(
                user = %identity.key(),
                generation,
                current = inner.generation,
                "discarding stale profile lookup"
            );
            return;
        }

        let profile = match result {
            Ok(profile) if profile.belongs_to(&identity) => Some(profile),
            Ok(profile) => {
                tracing::warn!(
                    user = %identity.key(),
                    profile = %profile.id,
                    "store returned a profile for another identity; ignoring it"
                );
                None
            }
            Err(e) => {
                tracing::warn!(user = %identity.key(), error = %e, "profile resolution failed");
                inner.last_profile_error = Some(e);
                None
            }
        };

        self.commit(&mut inner, SessionState::resolved(identity, profile));
    }

    fn end_registration(self: &Arc<Self>) {
        let mut inner = self.lock();
        inner.registering = inner.registering.saturating_sub(1);
        if inner.registering > 0 {
            return;
        }

        let Some((generation, identity)) = inner.deferred.take() else {
            return;
        };
        if generation != inner.generation {
            return;
        }

        drop(inner);
        self.spawn_lookup(generation, identity);
    }
}

/// Marks a registration as in flight for as long as it lives.
///
/// Dropping it (including when the `register` future is cancelled) releases
/// any lookup deferred in the meantime.
struct RegistrationGuard {
    shared: Arc<Shared>,
}

impl RegistrationGuard {
    fn begin(shared: &Arc<Shared>) -> Self {
        shared.lock().registering += 1;
        Self {
            shared: Arc::clone(shared),
        }
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.shared.end_registration();
    }
}
