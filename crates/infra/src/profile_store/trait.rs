use async_trait::async_trait;
use chrono::{DateTime, Utc};

use campus_auth::{Profile, ProfileFetchError, ReadError, WriteError};
use campus_core::{Course, CourseId, UserId};

/// A course ready to be written (the store assigns the id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourseRecord {
    pub course_name: String,
    pub course_code: String,
    pub description: String,
    pub teacher_id: UserId,
    pub teacher_name: String,
    pub created_at: DateTime<Utc>,
}

impl NewCourseRecord {
    pub fn into_course(self, id: CourseId) -> Course {
        Course {
            id,
            course_name: self.course_name,
            course_code: self.course_code,
            description: self.description,
            teacher_id: self.teacher_id,
            teacher_name: self.teacher_name,
            created_at: self.created_at,
        }
    }
}

/// Remote document store holding profiles and courses.
///
/// Profiles are keyed by the identity's stable key. Query semantics beyond
/// "list courses ordered by name" are the store's business.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: UserId) -> Result<Profile, ProfileFetchError>;

    /// Create or replace the profile stored under `profile.id`.
    async fn put_profile(&self, profile: Profile) -> Result<(), WriteError>;

    /// All courses, ordered by `course_name`.
    async fn list_courses(&self) -> Result<Vec<Course>, ReadError>;

    async fn create_course(&self, record: NewCourseRecord) -> Result<CourseId, WriteError>;
}
