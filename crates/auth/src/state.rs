//! The published session triple.

use serde::Serialize;

use crate::{Identity, Profile, Role};

/// `{identity, profile, loading}` as seen by every observer.
///
/// # Invariants
/// - `identity == None` implies `profile == None`.
/// - A present profile always belongs to the present identity.
/// - `loading == true` means "not yet checked": neither the identity nor the
///   profile lookup for it has settled.
///
/// Only the session controller produces values of this type (through the
/// constructors below, which uphold the invariants); everyone else reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    identity: Option<Identity>,
    profile: Option<Profile>,
    loading: bool,
}

/// The four distinguishable situations a view can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Identity or profile still being resolved.
    Pending,
    SignedOut,
    Resolved(&'a Profile),
    /// Signed in, but the profile lookup failed or found no record.
    ProfileMissing,
}

impl SessionState {
    /// State before the first identity event has been processed.
    pub fn pending() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: false,
        }
    }

    /// Signed in; profile lookup in flight.
    pub fn resolving(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            profile: None,
            loading: true,
        }
    }

    /// Signed in; profile lookup settled.
    ///
    /// A profile that does not belong to `identity` is dropped rather than
    /// published.
    pub fn resolved(identity: Identity, profile: Option<Profile>) -> Self {
        let profile = profile.filter(|p| p.belongs_to(&identity));
        Self {
            identity: Some(identity),
            profile,
            loading: false,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    pub fn resolution(&self) -> Resolution<'_> {
        if self.loading {
            return Resolution::Pending;
        }
        match (&self.identity, &self.profile) {
            (None, _) => Resolution::SignedOut,
            (Some(_), Some(profile)) => Resolution::Resolved(profile),
            (Some(_), None) => Resolution::ProfileMissing,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::pending()
    }
}
