//! Profile port for the auth crate
//!
//! Registration and session refreshes read profiles through this adapter.

use std::sync::Arc;

use auth::{AuthResult, Email, ProfileGateway, ProfileSnapshot};

use crate::application::config::CatalogConfig;
use crate::application::profile::GetProfileUseCase;
use crate::domain::repository::{CourseRepository, ProfileRepository};

pub struct CatalogProfiles<R> {
    repo: Arc<R>,
    config: Arc<CatalogConfig>,
}

impl<R> CatalogProfiles<R> {
    pub fn new(repo: Arc<R>, config: Arc<CatalogConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for CatalogProfiles<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> ProfileGateway for CatalogProfiles<R>
where
    R: CourseRepository + ProfileRepository + Send + Sync + 'static,
{
    async fn load_or_create_profile(&self, email: &Email) -> AuthResult<ProfileSnapshot> {
        let view = GetProfileUseCase::new(self.repo.clone(), self.repo.clone(), self.config.clone())
            .execute(email)
            .await?;

        Ok(ProfileSnapshot {
            name: view.profile.name,
            selected_course: view.course.map(|c| c.id.into_uuid()),
            profile_image: view.profile.profile_image,
        })
    }
}
