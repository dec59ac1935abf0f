//! Repository Traits

use auth::Email;
use kernel::id::CourseId;

use crate::domain::course::Course;
use crate::domain::profile::Profile;
use crate::error::CatalogResult;

/// Course repository trait
#[trait_variant::make(CourseRepository: Send)]
pub trait LocalCourseRepository {
    /// All courses, oldest first
    async fn list_courses(&self) -> CatalogResult<Vec<Course>>;

    async fn find_course(&self, id: &CourseId) -> CatalogResult<Option<Course>>;

    async fn insert_course(&self, course: &Course) -> CatalogResult<()>;

    /// Overwrite the stored document; returns false if the id is unknown
    async fn replace_course(&self, course: &Course) -> CatalogResult<bool>;

    /// Returns false if nothing was deleted
    async fn delete_course(&self, id: &CourseId) -> CatalogResult<bool>;
}

/// Profile repository trait, keyed by normalized email
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    async fn find_profile(&self, email: &Email) -> CatalogResult<Option<Profile>>;

    /// Insert unless a profile for the email exists; returns the stored row
    async fn insert_profile_if_absent(&self, profile: &Profile) -> CatalogResult<Profile>;

    /// Insert; fails with `ProfileExists` on a duplicate email
    async fn insert_profile(&self, profile: &Profile) -> CatalogResult<()>;

    /// Returns false if the profile is gone
    async fn update_profile(&self, profile: &Profile) -> CatalogResult<bool>;

    async fn delete_profile(&self, email: &Email) -> CatalogResult<bool>;

    /// All profiles, oldest first
    async fn list_profiles(&self) -> CatalogResult<Vec<Profile>>;
}

/// Everything the catalog routes need from storage
pub trait CatalogStore: CourseRepository + ProfileRepository + Clone + Send + Sync + 'static {}

impl<T> CatalogStore for T where
    T: CourseRepository + ProfileRepository + Clone + Send + Sync + 'static
{
}
