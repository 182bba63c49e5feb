//! Identity provider boundary.
//!
//! Login, registration and logout are delegated to a remote provider; this
//! module defines the capability the session controller consumes and an
//! in-memory implementation for tests/dev.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryIdentityProvider;
pub use r#trait::IdentityProvider;
