//! `campus-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the domain error model and the course record.

pub mod course;
pub mod error;
pub mod id;

pub use course::{Course, NewCourse};
pub use error::{DomainError, DomainResult};
pub use id::{CourseId, UserId};
