//! In-Memory Repository Implementations
//!
//! Same semantics as the PostgreSQL repository. Backs the tests of this
//! crate and of the moderation crate.

use std::sync::Arc;

use auth::Email;
use kernel::id::CourseId;
use tokio::sync::RwLock;

use crate::domain::course::Course;
use crate::domain::profile::Profile;
use crate::domain::repository::{CourseRepository, ProfileRepository};
use crate::error::{CatalogError, CatalogResult};

#[derive(Clone, Default)]
pub struct InMemoryCatalogRepository {
    courses: Arc<RwLock<Vec<Course>>>,
    profiles: Arc<RwLock<Vec<Profile>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }
}

impl CourseRepository for InMemoryCatalogRepository {
    async fn list_courses(&self) -> CatalogResult<Vec<Course>> {
        Ok(self.courses.read().await.clone())
    }

    async fn find_course(&self, id: &CourseId) -> CatalogResult<Option<Course>> {
        let courses = self.courses.read().await;
        Ok(courses.iter().find(|c| &c.id == id).cloned())
    }

    async fn insert_course(&self, course: &Course) -> CatalogResult<()> {
        self.courses.write().await.push(course.clone());
        Ok(())
    }

    async fn replace_course(&self, course: &Course) -> CatalogResult<bool> {
        let mut courses = self.courses.write().await;
        match courses.iter_mut().find(|c| c.id == course.id) {
            Some(stored) => {
                // Enrollments and creation time are not client-writable
                let enrollments = stored.enrollments;
                let created_at = stored.created_at;
                *stored = course.clone();
                stored.enrollments = enrollments;
                stored.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_course(&self, id: &CourseId) -> CatalogResult<bool> {
        let mut courses = self.courses.write().await;
        let before = courses.len();
        courses.retain(|c| &c.id != id);
        Ok(courses.len() < before)
    }
}

impl ProfileRepository for InMemoryCatalogRepository {
    async fn find_profile(&self, email: &Email) -> CatalogResult<Option<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| &p.email == email).cloned())
    }

    async fn insert_profile_if_absent(&self, profile: &Profile) -> CatalogResult<Profile> {
        let mut profiles = self.profiles.write().await;
        if let Some(existing) = profiles.iter().find(|p| p.email == profile.email) {
            return Ok(existing.clone());
        }
        profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn insert_profile(&self, profile: &Profile) -> CatalogResult<()> {
        let mut profiles = self.profiles.write().await;
        if profiles.iter().any(|p| p.email == profile.email) {
            return Err(CatalogError::ProfileExists);
        }
        profiles.push(profile.clone());
        Ok(())
    }

    async fn update_profile(&self, profile: &Profile) -> CatalogResult<bool> {
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.email == profile.email) {
            Some(stored) => {
                stored.name = profile.name.clone();
                stored.selected_course = profile.selected_course;
                stored.profile_image = profile.profile_image.clone();
                stored.updated_at = profile.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_profile(&self, email: &Email) -> CatalogResult<bool> {
        let mut profiles = self.profiles.write().await;
        let before = profiles.len();
        profiles.retain(|p| &p.email != email);
        Ok(profiles.len() < before)
    }

    async fn list_profiles(&self) -> CatalogResult<Vec<Profile>> {
        Ok(self.profiles.read().await.clone())
    }
}
