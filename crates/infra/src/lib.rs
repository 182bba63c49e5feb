//! Infrastructure layer: boundaries to the remote identity provider and the
//! document store, plus in-memory implementations for dev and tests.

pub mod connectivity;
pub mod identity;
pub mod profile_store;

pub use connectivity::{Connectivity, ConnectivityState, OfflineError};
pub use identity::{IdentityProvider, InMemoryIdentityProvider};
pub use profile_store::{InMemoryProfileStore, NewCourseRecord, ProfileStore};
