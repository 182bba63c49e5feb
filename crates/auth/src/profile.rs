//! Application-level user profile (role + display attributes).

use serde::{Deserialize, Serialize};

use campus_core::{CourseId, UserId};

use crate::{Identity, Role};

/// Profile document keyed by the identity's stable key.
///
/// # Invariants
/// - `id` equals the key of the identity it belongs to.
/// - Created once, at registration; the role never changes within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub enrolled_courses: Vec<CourseId>,
}

impl Profile {
    /// Initial profile for a freshly registered identity.
    pub fn for_identity(identity: &Identity, registration: &Registration) -> Self {
        Self {
            id: identity.key(),
            display_name: registration.display_name.clone(),
            email: identity.email().to_string(),
            role: registration.role,
            enrolled_courses: Vec::new(),
        }
    }

    pub fn belongs_to(&self, identity: &Identity) -> bool {
        self.id == identity.key()
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}

/// Profile attributes collected by the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub display_name: String,
    pub role: Role,
}

impl Registration {
    pub fn new(display_name: impl Into<String>, role: Role) -> Self {
        Self {
            display_name: display_name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_profile_copies_identity_key_and_email() {
        let identity = Identity::new(UserId::new(), "jane@univ.edu");
        let profile = Profile::for_identity(&identity, &Registration::new("Jane", Role::Teacher));

        assert!(profile.belongs_to(&identity));
        assert_eq!(profile.email, "jane@univ.edu");
        assert!(profile.is_teacher());
        assert!(profile.enrolled_courses.is_empty());
    }

    #[test]
    fn missing_enrolments_deserialize_as_empty() {
        let id = UserId::new();
        let json = serde_json::json!({
            "id": id,
            "displayName": "Sam",
            "email": "sam@univ.edu",
            "role": "student",
        });
        let profile: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.role, Role::Student);
        assert!(profile.enrolled_courses.is_empty());
    }
}
