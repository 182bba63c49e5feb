//! Document store boundary (profiles and courses).

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryProfileStore;
pub use r#trait::{NewCourseRecord, ProfileStore};
