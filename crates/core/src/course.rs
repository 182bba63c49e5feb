//! Course records as stored in the document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CourseId, DomainError, DomainResult, UserId};

/// A persisted course.
///
/// Field names follow the document store's camelCase layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub course_name: String,
    pub course_code: String,
    pub description: String,
    pub teacher_id: UserId,
    pub teacher_name: String,
    pub created_at: DateTime<Utc>,
}

/// User-supplied input for a new course (the "Create Course" form).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub course_name: String,
    pub course_code: String,
    pub description: String,
}

impl NewCourse {
    pub fn new(
        course_name: impl Into<String>,
        course_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            course_name: course_name.into(),
            course_code: course_code.into(),
            description: description.into(),
        }
    }

    /// Validate and normalize the input.
    ///
    /// Name and code are required; surrounding whitespace is trimmed from all
    /// fields. The description may be empty.
    pub fn validate(self) -> DomainResult<Self> {
        let course_name = self.course_name.trim().to_string();
        let course_code = self.course_code.trim().to_string();
        let description = self.description.trim().to_string();

        if course_name.is_empty() {
            return Err(DomainError::validation("course name is required"));
        }
        if course_code.is_empty() {
            return Err(DomainError::validation("course code is required"));
        }

        Ok(Self {
            course_name,
            course_code,
            description,
        })
    }
}
