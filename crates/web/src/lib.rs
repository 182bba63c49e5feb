//! CampusConnect view layer.
//!
//! Pure view-model logic over the session triple: the route table, the
//! navigation bar, the dashboard summary and course creation. Rendering is
//! left to whichever frontend drives these.

pub mod courses;
pub mod dashboard;
pub mod navigation;
pub mod routes;

pub use courses::{CourseError, create_course, list_courses};
pub use dashboard::{CourseCard, DashboardSummary};
pub use navigation::{NavItem, after_logout, avatar_initial, nav_items, resume_location};
pub use routes::{Page, RouteOutcome, Router};
