//! Course creation and listing on behalf of the signed-in user.

use campus_auth::{ReadError, Resolution, SessionState, WriteError};
use campus_core::{Course, CourseId, DomainError, NewCourse};
use campus_infra::{NewCourseRecord, ProfileStore};
use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CourseError {
    #[error("sign in to create a course")]
    NotSignedIn,

    #[error("only teachers can create courses")]
    NotTeacher,

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("failed to create course: {0}")]
    Write(#[from] WriteError),
}

/// Create a course owned by the signed-in teacher.
///
/// Returns the new course's id; the caller navigates to its page.
pub async fn create_course(
    state: &SessionState,
    store: &dyn ProfileStore,
    input: NewCourse,
) -> Result<CourseId, CourseError> {
    let teacher = match state.resolution() {
        Resolution::Pending | Resolution::SignedOut => return Err(CourseError::NotSignedIn),
        Resolution::ProfileMissing => return Err(CourseError::NotTeacher),
        Resolution::Resolved(profile) if !profile.is_teacher() => {
            return Err(CourseError::NotTeacher);
        }
        Resolution::Resolved(profile) => profile,
    };

    let input = input.validate()?;
    let record = NewCourseRecord {
        course_name: input.course_name,
        course_code: input.course_code,
        description: input.description,
        teacher_id: teacher.id,
        teacher_name: teacher.display_name.clone(),
        created_at: Utc::now(),
    };

    let id = store
        .create_course(record)
        .await
        .inspect_err(|e| tracing::warn!(teacher = %teacher.id, error = %e, "course creation failed"))?;
    tracing::info!(course = %id, teacher = %teacher.id, "course created");
    Ok(id)
}

/// All courses, ordered by name.
pub async fn list_courses(store: &dyn ProfileStore) -> Result<Vec<Course>, ReadError> {
    store.list_courses().await
}

#[cfg(test)]
mod tests {
    use campus_auth::{Identity, Profile, Role};
    use campus_core::UserId;
    use campus_infra::InMemoryProfileStore;

    use super::*;

    fn signed_in(role: Role) -> SessionState {
        let identity = Identity::new(UserId::new(), "jane@univ.edu");
        let profile = Profile {
            id: identity.key(),
            display_name: "Jane".to_string(),
            email: identity.email().to_string(),
            role,
            enrolled_courses: vec![],
        };
        SessionState::resolved(identity, Some(profile))
    }

    fn input() -> NewCourse {
        NewCourse::new(" Data Structures ", "CS-301", "Trees and graphs")
    }

    #[tokio::test]
    async fn teacher_creates_stamped_course() {
        let store = InMemoryProfileStore::new();
        let state = signed_in(Role::Teacher);

        let id = create_course(&state, &store, input()).await.unwrap();

        let courses = list_courses(&store).await.unwrap();
        assert_eq!(courses.len(), 1);
        let course = &courses[0];
        assert_eq!(course.id, id);
        assert_eq!(course.course_name, "Data Structures");
        assert_eq!(course.teacher_id, state.identity().unwrap().key());
        assert_eq!(course.teacher_name, "Jane");
    }

    #[tokio::test]
    async fn non_teachers_are_refused() {
        let store = InMemoryProfileStore::new();

        let err = create_course(&signed_in(Role::Student), &store, input()).await;
        assert_eq!(err, Err(CourseError::NotTeacher));

        let identity = Identity::new(UserId::new(), "jane@univ.edu");
        let missing = SessionState::resolved(identity, None);
        assert_eq!(
            create_course(&missing, &store, input()).await,
            Err(CourseError::NotTeacher)
        );

        for state in [SessionState::signed_out(), SessionState::pending()] {
            assert_eq!(
                create_course(&state, &store, input()).await,
                Err(CourseError::NotSignedIn)
            );
        }
        assert!(list_courses(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_writing() {
        let store = InMemoryProfileStore::new();
        let err = create_course(&signed_in(Role::Teacher), &store, NewCourse::new("", "CS-1", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, CourseError::Invalid(DomainError::Validation(_))));
        assert!(list_courses(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_surfaces_write_error() {
        let store = InMemoryProfileStore::new();
        store.connectivity().set_offline();
        let err = create_course(&signed_in(Role::Teacher), &store, input())
            .await
            .unwrap_err();
        assert!(matches!(err, CourseError::Write(WriteError::Network(_))));
    }
}
