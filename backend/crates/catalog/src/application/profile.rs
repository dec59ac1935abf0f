//! Profile Use Cases
//!
//! Profiles are keyed by email. Reading a missing profile creates the
//! default one, so every read path goes through `GetProfileUseCase`.

use std::sync::Arc;

use auth::Email;
use kernel::id::CourseId;
use platform::upload::UploadStore;

use crate::application::config::CatalogConfig;
use crate::application::courses::parse_course_id;
use crate::domain::course::Course;
use crate::domain::profile::Profile;
use crate::domain::repository::{CourseRepository, ProfileRepository};
use crate::error::{CatalogError, CatalogResult};

/// Profile with its selected course resolved
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: Profile,
    /// `None` when unset or when the course has been deleted
    pub course: Option<Course>,
}

// ============================================================================
// Read (with implicit create)
// ============================================================================

pub struct GetProfileUseCase<P, C>
where
    P: ProfileRepository,
    C: CourseRepository,
{
    profile_repo: Arc<P>,
    course_repo: Arc<C>,
    config: Arc<CatalogConfig>,
}

impl<P, C> GetProfileUseCase<P, C>
where
    P: ProfileRepository,
    C: CourseRepository,
{
    pub fn new(profile_repo: Arc<P>, course_repo: Arc<C>, config: Arc<CatalogConfig>) -> Self {
        Self {
            profile_repo,
            course_repo,
            config,
        }
    }

    pub async fn execute(&self, email: &Email) -> CatalogResult<ProfileView> {
        let profile = match self.profile_repo.find_profile(email).await? {
            Some(profile) => profile,
            None => {
                let default = Profile::new(
                    email.clone(),
                    &self.config.default_profile_name,
                    None,
                    &self.config.default_profile_image,
                );
                // A concurrent first read may have won; use whichever row is stored
                let stored = self.profile_repo.insert_profile_if_absent(&default).await?;
                if stored.id == default.id {
                    tracing::info!(email = %email, "Default profile created");
                }
                stored
            }
        };

        let course = resolve_course(self.course_repo.as_ref(), profile.selected_course).await?;

        Ok(ProfileView { profile, course })
    }
}

pub(crate) async fn resolve_course<C>(
    course_repo: &C,
    selected: Option<CourseId>,
) -> CatalogResult<Option<Course>>
where
    C: CourseRepository,
{
    match selected {
        Some(id) => course_repo.find_course(&id).await,
        None => Ok(None),
    }
}

// ============================================================================
// Create / update
// ============================================================================

/// Which form fields an endpoint requires
///
/// `email` always resolves (it defaults to the session email) and `name` is
/// always required. The free-text `profile` field is accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileFormRules {
    pub course_required: bool,
    /// Fail if the profile already exists (create) or does not (update)
    pub must_exist: bool,
}

impl ProfileFormRules {
    pub const CREATE: Self = Self {
        course_required: true,
        must_exist: false,
    };

    pub const UPDATE: Self = Self {
        course_required: false,
        must_exist: true,
    };
}

/// Parsed profile form
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub course: Option<String>,
    pub image: Option<ImageUpload>,
}

/// An uploaded file part
#[derive(Clone, Default)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

pub struct SaveProfileUseCase<P, C>
where
    P: ProfileRepository,
    C: CourseRepository,
{
    profile_repo: Arc<P>,
    course_repo: Arc<C>,
    uploads: Arc<UploadStore>,
    config: Arc<CatalogConfig>,
}

impl<P, C> SaveProfileUseCase<P, C>
where
    P: ProfileRepository,
    C: CourseRepository,
{
    pub fn new(
        profile_repo: Arc<P>,
        course_repo: Arc<C>,
        uploads: Arc<UploadStore>,
        config: Arc<CatalogConfig>,
    ) -> Self {
        Self {
            profile_repo,
            course_repo,
            uploads,
            config,
        }
    }

    pub async fn execute(
        &self,
        email: &Email,
        input: ProfileInput,
        rules: ProfileFormRules,
    ) -> CatalogResult<ProfileView> {
        let name = input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let course_raw = input
            .course
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let Some(name) = name else {
            return Err(CatalogError::Validation("Missing required fields".to_string()));
        };
        if rules.course_required && course_raw.is_none() {
            return Err(CatalogError::Validation("Missing required fields".to_string()));
        }

        let course = match course_raw {
            Some(raw) => {
                let id = parse_course_id(&raw).ok_or(CatalogError::CourseNotFound)?;
                let course = self
                    .course_repo
                    .find_course(&id)
                    .await?
                    .ok_or(CatalogError::CourseNotFound)?;
                Some(course)
            }
            None => None,
        };

        if let Some(image) = &input.image {
            check_image(image)?;
        }

        let existing = self.profile_repo.find_profile(email).await?;

        match (existing, rules.must_exist) {
            (Some(_), false) => Err(CatalogError::ProfileExists),
            (None, true) => Err(CatalogError::ProfileNotFound),
            (None, false) => {
                let image = match input.image {
                    Some(image) => self.store(image).await?,
                    None => self.config.default_profile_image.clone(),
                };
                let profile =
                    Profile::new(email.clone(), name, course.as_ref().map(|c| c.id), image);
                self.profile_repo.insert_profile(&profile).await?;

                tracing::info!(email = %email, "Profile created");
                Ok(ProfileView { profile, course })
            }
            (Some(mut profile), true) => {
                let image = match input.image {
                    Some(image) => Some(self.store(image).await?),
                    None => None,
                };
                profile.apply(name, course.as_ref().map(|c| c.id), image);

                if !self.profile_repo.update_profile(&profile).await? {
                    return Err(CatalogError::ProfileNotFound);
                }

                // An update without a course keeps the old selection
                let course = match course {
                    Some(course) => Some(course),
                    None => {
                        resolve_course(self.course_repo.as_ref(), profile.selected_course).await?
                    }
                };

                tracing::info!(email = %email, "Profile updated");
                Ok(ProfileView { profile, course })
            }
        }
    }

    async fn store(&self, image: ImageUpload) -> CatalogResult<String> {
        Ok(self
            .uploads
            .save(image.file_name.as_deref(), &image.bytes)
            .await?)
    }
}

fn check_image(image: &ImageUpload) -> CatalogResult<()> {
    match image.content_type.as_deref() {
        Some(ct) if !ct.starts_with("image/") => Err(CatalogError::Validation(
            "Profile image must be an image file".to_string(),
        )),
        _ => Ok(()),
    }
}
