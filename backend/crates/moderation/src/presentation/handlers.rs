//! HTTP Handlers

use std::sync::Arc;

use auth::AuthStore;
use axum::extract::{Path, State};
use catalog::CatalogStore;
use kernel::id::{BannedEmailId, UserId};
use kernel::response::ApiResponse;

use crate::application::{
    BanUserUseCase, CourseEnrollment, CoursesWithUsersUseCase, ListBansUseCase, ListUsersUseCase,
    UnbanUserUseCase, UserSummary,
};
use crate::error::{ModerationError, ModerationResult};
use crate::presentation::dto::BannedEmailResponse;

/// Shared state for moderation handlers
pub struct ModerationAppState<A, C> {
    pub auth: Arc<A>,
    pub catalog: Arc<C>,
}

impl<A, C> Clone for ModerationAppState<A, C> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

/// GET /api/users
pub async fn list_users<A: AuthStore, C: CatalogStore>(
    State(state): State<ModerationAppState<A, C>>,
) -> ModerationResult<ApiResponse<Vec<UserSummary>>> {
    let users = ListUsersUseCase::new(state.auth.clone()).execute().await?;
    Ok(ApiResponse::with_data("Users retrieved", users))
}

/// DELETE /api/users/{id}
pub async fn ban_user<A: AuthStore, C: CatalogStore>(
    State(state): State<ModerationAppState<A, C>>,
    Path(id): Path<String>,
) -> ModerationResult<ApiResponse<BannedEmailResponse>> {
    // A malformed id cannot name a user
    let user_id: UserId = id.parse().map_err(|_| ModerationError::UserNotFound)?;

    let ban = BanUserUseCase::new(
        state.auth.clone(),
        state.auth.clone(),
        state.auth.clone(),
        state.catalog.clone(),
    )
    .execute(&user_id)
    .await?;

    Ok(ApiResponse::with_data(
        "User blocked, banned, and deleted successfully",
        ban.into(),
    ))
}

/// GET /api/banned-users
pub async fn list_banned<A: AuthStore, C: CatalogStore>(
    State(state): State<ModerationAppState<A, C>>,
) -> ModerationResult<ApiResponse<Vec<BannedEmailResponse>>> {
    let bans = ListBansUseCase::new(state.auth.clone()).execute().await?;
    Ok(ApiResponse::with_data(
        "Banned users retrieved",
        bans.into_iter().map(Into::into).collect(),
    ))
}

/// PUT /api/banned-users/{id}/unblock
pub async fn unblock<A: AuthStore, C: CatalogStore>(
    State(state): State<ModerationAppState<A, C>>,
    Path(id): Path<String>,
) -> ModerationResult<ApiResponse<BannedEmailResponse>> {
    let ban_id: BannedEmailId = id.parse().map_err(|_| ModerationError::BanNotFound)?;

    let ban = UnbanUserUseCase::new(state.auth.clone())
        .execute(&ban_id)
        .await?;

    Ok(ApiResponse::with_data("User unblocked successfully", ban.into()))
}

/// GET /api/courses-with-users
pub async fn courses_with_users<A: AuthStore, C: CatalogStore>(
    State(state): State<ModerationAppState<A, C>>,
) -> ModerationResult<ApiResponse<Vec<CourseEnrollment>>> {
    let courses = CoursesWithUsersUseCase::new(state.catalog.clone(), state.catalog.clone())
        .execute()
        .await?;
    Ok(ApiResponse::with_data("Courses with enrolled users", courses))
}
