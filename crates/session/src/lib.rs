//! `campus-session`: the session state controller.
//!
//! **Responsibility:** single source of truth for who is signed in, which
//! profile (and role) they have, and whether that is still being worked out.
//!
//! The controller subscribes to the identity provider, resolves the matching
//! profile from the document store, and publishes a consistent
//! [`SessionState`] to every observer. Route guards evaluate that state with
//! the [`campus_auth::AccessGate`].

pub mod config;
pub mod controller;
pub mod error;

pub use campus_auth::SessionState;
pub use config::SessionConfig;
pub use controller::SessionController;
pub use error::RegisterError;
