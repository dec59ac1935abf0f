//! HTTP Handlers

use std::sync::Arc;

use auth::domain::repository::BannedEmailRepository;
use auth::{AuthSession, AuthStore, CurrentSession, Email};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use kernel::error::app_error::AppError;
use kernel::response::ApiResponse;
use platform::upload::UploadStore;

use crate::application::config::CatalogConfig;
use crate::application::courses::{CourseService, parse_course_id};
use crate::application::profile::{
    GetProfileUseCase, ImageUpload, ProfileFormRules, ProfileInput, SaveProfileUseCase,
};
use crate::domain::course::{Course, CourseDraft};
use crate::domain::repository::CatalogStore;
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{ProfileQuery, ProfileResponse};

/// Shared state for catalog handlers
pub struct CatalogAppState<R, A> {
    pub repo: Arc<R>,
    /// Ban list lookups
    pub auth: Arc<A>,
    pub uploads: Arc<UploadStore>,
    pub config: Arc<CatalogConfig>,
}

impl<R, A> Clone for CatalogAppState<R, A> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            auth: self.auth.clone(),
            uploads: self.uploads.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Courses
// ============================================================================

/// GET /api/courses
pub async fn list_courses<R: CatalogStore, A: AuthStore>(
    State(state): State<CatalogAppState<R, A>>,
) -> CatalogResult<ApiResponse<Vec<Course>>> {
    let courses = CourseService::new(state.repo.clone()).list().await?;
    Ok(ApiResponse::with_data("Courses retrieved", courses))
}

/// GET /api/course/{id} and /api/courses/{id}
pub async fn get_course<R: CatalogStore, A: AuthStore>(
    State(state): State<CatalogAppState<R, A>>,
    Path(id): Path<String>,
) -> CatalogResult<ApiResponse<Course>> {
    let id = parse_course_id(&id).ok_or(CatalogError::CourseNotFound)?;
    let course = CourseService::new(state.repo.clone()).get(&id).await?;
    Ok(ApiResponse::with_data("Course retrieved", course))
}

/// POST /api/courses (admin)
pub async fn create_course<R: CatalogStore, A: AuthStore>(
    State(state): State<CatalogAppState<R, A>>,
    Json(draft): Json<CourseDraft>,
) -> CatalogResult<impl IntoResponse> {
    let course = CourseService::new(state.repo.clone()).create(draft).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data("Course created successfully", course),
    ))
}

/// PUT /api/courses/{id} (admin); replaces the whole document
pub async fn update_course<R: CatalogStore, A: AuthStore>(
    State(state): State<CatalogAppState<R, A>>,
    Path(id): Path<String>,
    Json(draft): Json<CourseDraft>,
) -> CatalogResult<ApiResponse<Course>> {
    let id = parse_course_id(&id).ok_or(CatalogError::CourseNotFound)?;
    let course = CourseService::new(state.repo.clone())
        .update(&id, draft)
        .await?;
    Ok(ApiResponse::with_data("Course updated successfully", course))
}

/// DELETE /api/courses/{id} (admin)
pub async fn delete_course<R: CatalogStore, A: AuthStore>(
    State(state): State<CatalogAppState<R, A>>,
    Path(id): Path<String>,
) -> CatalogResult<ApiResponse<()>> {
    let id = parse_course_id(&id).ok_or(CatalogError::CourseNotFound)?;
    CourseService::new(state.repo.clone()).delete(&id).await?;
    Ok(ApiResponse::message("Course deleted successfully"))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/profile?email=
pub async fn get_profile<R: CatalogStore, A: AuthStore>(
    State(state): State<CatalogAppState<R, A>>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Query(query): Query<ProfileQuery>,
) -> CatalogResult<ApiResponse<ProfileResponse>> {
    let email = target_email(&session, query.email.as_deref())?;
    ensure_not_banned(state.auth.as_ref(), &email).await?;

    let view = GetProfileUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone())
        .execute(&email)
        .await?;

    Ok(ApiResponse::with_data("Profile retrieved", view.into()))
}

/// POST /api/profile (multipart)
pub async fn create_profile<R: CatalogStore, A: AuthStore>(
    State(state): State<CatalogAppState<R, A>>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    multipart: Multipart,
) -> CatalogResult<impl IntoResponse> {
    let view = save_profile(&state, &session, multipart, ProfileFormRules::CREATE).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data("Profile created successfully", ProfileResponse::from(view)),
    ))
}

/// PUT /api/profile (multipart)
pub async fn update_profile<R: CatalogStore, A: AuthStore>(
    State(state): State<CatalogAppState<R, A>>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    multipart: Multipart,
) -> CatalogResult<ApiResponse<ProfileResponse>> {
    let view = save_profile(&state, &session, multipart, ProfileFormRules::UPDATE).await?;
    Ok(ApiResponse::with_data(
        "Profile updated successfully",
        view.into(),
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn save_profile<R: CatalogStore, A: AuthStore>(
    state: &CatalogAppState<R, A>,
    session: &AuthSession,
    multipart: Multipart,
    rules: ProfileFormRules,
) -> CatalogResult<crate::application::profile::ProfileView> {
    let (requested_email, input) = read_profile_form(multipart).await?;
    let email = target_email(session, requested_email.as_deref())?;
    ensure_not_banned(state.auth.as_ref(), &email).await?;

    SaveProfileUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.uploads.clone(),
        state.config.clone(),
    )
    .execute(&email, input, rules)
    .await
}

/// Users act on their own profile; admins must name the email
fn target_email(session: &AuthSession, requested: Option<&str>) -> CatalogResult<Email> {
    match requested.map(str::trim).filter(|e| !e.is_empty()) {
        Some(raw) => {
            let email = Email::new(raw)?;
            if !session.is_admin && email != session.email {
                return Err(CatalogError::NotOwner);
            }
            Ok(email)
        }
        None if session.is_admin => {
            Err(CatalogError::Validation("Email is required".to_string()))
        }
        None => Ok(session.email.clone()),
    }
}

/// The middleware only vets the session's own email; admins can name others
async fn ensure_not_banned<A: AuthStore>(auth: &A, email: &Email) -> CatalogResult<()> {
    if auth.is_banned(email).await? {
        return Err(CatalogError::Banned);
    }
    Ok(())
}

/// Collect `email`, `name`, `course` and `profileImage`; other parts
/// (including the free-text `profile`) are skipped.
async fn read_profile_form(
    mut multipart: Multipart,
) -> CatalogResult<(Option<String>, ProfileInput)> {
    let mut email = None;
    let mut input = ProfileInput::default();

    while let Some(field) = multipart.next_field().await.map_err(AppError::from)? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "email" => email = Some(field.text().await.map_err(AppError::from)?),
            "name" => input.name = Some(field.text().await.map_err(AppError::from)?),
            "course" | "selectedCourse" => {
                input.course = Some(field.text().await.map_err(AppError::from)?)
            }
            "profileImage" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(AppError::from)?;

                // Browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    input.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok((email, input))
}
