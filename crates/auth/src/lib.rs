//! `campus-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from the identity provider, the
//! document store and any rendering framework. It defines who a principal is
//! ([`Identity`], [`Profile`], [`Role`]), the published [`SessionState`], and
//! the [`AccessGate`] that turns a state plus a route policy into a decision.

pub mod error;
pub mod gate;
pub mod identity;
pub mod profile;
pub mod roles;
pub mod state;

pub use error::{AuthError, ProfileFetchError, ReadError, WriteError};
pub use gate::{
    AccessGate, AccessPolicy, GateExplanation, GateOutcome, Redirect, RedirectReason, RouteConfig,
    decide, local_path, path_of,
};
pub use identity::{Credential, Identity};
pub use profile::{Profile, Registration};
pub use roles::{ParseRoleError, Role};
pub use state::{Resolution, SessionState};
