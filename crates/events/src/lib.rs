//! `campus-events`: publish/subscribe mechanics.
//!
//! Used for the identity provider's "current identity changed" stream and for
//! fanning session-state snapshots out to observers.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
