//! Dashboard view model.

use campus_auth::SessionState;
use campus_core::{Course, CourseId};
use serde::Serialize;

pub const EMPTY_TEACHER: &str = "Create your first course to get started";
pub const EMPTY_STUDENT: &str = "No courses available. Check back later!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCard {
    pub id: CourseId,
    pub course_name: String,
    pub course_code: String,
    pub teacher_name: String,
    /// The signed-in teacher created this course.
    pub owned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub greeting_name: Option<String>,
    pub total_courses: usize,
    pub enrolled_courses: usize,
    pub can_create_course: bool,
    pub courses: Vec<CourseCard>,
    /// Set only when there are no courses to show.
    pub empty_message: Option<&'static str>,
}

impl DashboardSummary {
    pub fn build(state: &SessionState, courses: &[Course]) -> Self {
        let profile = state.profile();
        let is_teacher = profile.is_some_and(|p| p.is_teacher());

        let cards = courses
            .iter()
            .map(|course| CourseCard {
                id: course.id,
                course_name: course.course_name.clone(),
                course_code: course.course_code.clone(),
                teacher_name: course.teacher_name.clone(),
                owned: profile.is_some_and(|p| p.id == course.teacher_id),
            })
            .collect::<Vec<_>>();

        let empty_message = match (cards.is_empty(), is_teacher) {
            (false, _) => None,
            (true, true) => Some(EMPTY_TEACHER),
            (true, false) => Some(EMPTY_STUDENT),
        };

        Self {
            greeting_name: profile.map(|p| p.display_name.clone()),
            total_courses: cards.len(),
            enrolled_courses: profile.map_or(0, |p| p.enrolled_courses.len()),
            can_create_course: is_teacher,
            courses: cards,
            empty_message,
        }
    }
}
