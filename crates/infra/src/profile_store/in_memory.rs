use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use campus_auth::{Profile, ProfileFetchError, ReadError, WriteError};
use campus_core::{Course, CourseId, UserId};

use super::r#trait::{NewCourseRecord, ProfileStore};
use crate::connectivity::Connectivity;

/// In-memory document store.
///
/// Intended for tests/dev. Profile lookups can be slowed down per user to
/// reproduce lookups that resolve out of order.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<UserId, Profile>>,
    courses: RwLock<Vec<Course>>,
    latency: RwLock<HashMap<UserId, Duration>>,
    connectivity: Connectivity,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.insert_profile(profile);
        self
    }

    pub fn insert_profile(&self, profile: Profile) {
        if let Ok(mut profiles) = self.profiles.write() {
            profiles.insert(profile.id, profile);
        }
    }

    pub fn profile(&self, id: UserId) -> Option<Profile> {
        self.profiles.read().ok()?.get(&id).cloned()
    }

    /// Delay every lookup of `id` by `delay`.
    pub fn set_latency(&self, id: UserId, delay: Duration) {
        if let Ok(mut latency) = self.latency.write() {
            latency.insert(id, delay);
        }
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    fn latency_for(&self, id: UserId) -> Option<Duration> {
        self.latency.read().ok()?.get(&id).copied()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, id: UserId) -> Result<Profile, ProfileFetchError> {
        if let Some(delay) = self.latency_for(id) {
            tokio::time::sleep(delay).await;
        }

        self.connectivity
            .require_online()
            .map_err(|e| ProfileFetchError::Network(e.to_string()))?;

        let profiles = self
            .profiles
            .read()
            .map_err(|_| ProfileFetchError::Network("lock poisoned".to_string()))?;
        profiles.get(&id).cloned().ok_or(ProfileFetchError::NotFound(id))
    }

    async fn put_profile(&self, profile: Profile) -> Result<(), WriteError> {
        self.connectivity
            .require_online()
            .map_err(|e| WriteError::Network(e.to_string()))?;

        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| WriteError::Rejected("lock poisoned".to_string()))?;
        profiles.insert(profile.id, profile);
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, ReadError> {
        self.connectivity
            .require_online()
            .map_err(|e| ReadError::Network(e.to_string()))?;

        let mut courses = self
            .courses
            .read()
            .map_err(|_| ReadError::Network("lock poisoned".to_string()))?
            .clone();
        courses.sort_by(|a, b| a.course_name.cmp(&b.course_name));
        Ok(courses)
    }

    async fn create_course(&self, record: NewCourseRecord) -> Result<CourseId, WriteError> {
        self.connectivity
            .require_online()
            .map_err(|e| WriteError::Network(e.to_string()))?;

        let id = CourseId::new();
        let mut courses = self
            .courses
            .write()
            .map_err(|_| WriteError::Rejected("lock poisoned".to_string()))?;
        courses.push(record.into_course(id));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use campus_auth::Role;
    use chrono::Utc;

    use super::*;

    fn profile(role: Role) -> Profile {
        Profile {
            id: UserId::new(),
            display_name: "Jane".to_string(),
            email: "jane@univ.edu".to_string(),
            role,
            enrolled_courses: vec![],
        }
    }

    fn record(name: &str, teacher: &Profile) -> NewCourseRecord {
        NewCourseRecord {
            course_name: name.to_string(),
            course_code: "CS-1".to_string(),
            description: String::new(),
            teacher_id: teacher.id,
            teacher_name: teacher.display_name.clone(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn get_profile_reports_not_found() {
        let store = InMemoryProfileStore::new();
        let id = UserId::new();
        assert_eq!(store.get_profile(id).await, Err(ProfileFetchError::NotFound(id)));
    }

    #[tokio::test]
    async fn put_then_get_returns_profile() {
        let store = InMemoryProfileStore::new();
        let teacher = profile(Role::Teacher);
        store.put_profile(teacher.clone()).await.unwrap();
        assert_eq!(store.get_profile(teacher.id).await, Ok(teacher));
    }

    #[tokio::test]
    async fn offline_store_fails_reads_and_writes() {
        let teacher = profile(Role::Teacher);
        let store = InMemoryProfileStore::new().with_profile(teacher.clone());
        store.connectivity().set_offline();

        assert!(matches!(
            store.get_profile(teacher.id).await,
            Err(ProfileFetchError::Network(_))
        ));
        assert!(matches!(
            store.put_profile(teacher.clone()).await,
            Err(WriteError::Network(_))
        ));
        assert!(matches!(store.list_courses().await, Err(ReadError::Network(_))));
        assert!(matches!(
            store.create_course(record("Algorithms", &teacher)).await,
            Err(WriteError::Network(_))
        ));
    }

    #[tokio::test]
    async fn courses_are_listed_by_name() {
        let store = InMemoryProfileStore::new();
        let teacher = profile(Role::Teacher);
        for name in ["Operating Systems", "Algorithms", "Databases"] {
            store.create_course(record(name, &teacher)).await.unwrap();
        }

        let names: Vec<_> = store
            .list_courses()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.course_name)
            .collect();
        assert_eq!(names, ["Algorithms", "Databases", "Operating Systems"]);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_lookup() {
        let teacher = profile(Role::Teacher);
        let store = InMemoryProfileStore::new().with_profile(teacher.clone());
        store.set_latency(teacher.id, Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        store.get_profile(teacher.id).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
