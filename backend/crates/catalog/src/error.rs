//! Catalog Error Types

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::upload::UploadError;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    #[error("Course not found")]
    CourseNotFound,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Profile already exists")]
    ProfileExists,

    /// Session may not touch this profile
    #[error("You can only access your own profile")]
    NotOwner,

    /// Target email is on the ban list
    #[error("This email has been banned.")]
    Banned,

    #[error("Uploaded file is too large")]
    UploadTooLarge,

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) => ErrorKind::BadRequest,
            CatalogError::CourseNotFound | CatalogError::ProfileNotFound => ErrorKind::NotFound,
            CatalogError::ProfileExists => ErrorKind::Conflict,
            CatalogError::NotOwner | CatalogError::Banned => ErrorKind::Forbidden,
            CatalogError::UploadTooLarge => ErrorKind::PayloadTooLarge,
            CatalogError::Upload(UploadError::Empty) => ErrorKind::BadRequest,
            CatalogError::Upload(_) | CatalogError::Database(_) | CatalogError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CatalogError::Database(_) => AppError::internal("Database error"),
            CatalogError::Upload(UploadError::Empty) => {
                AppError::bad_request("Uploaded file is empty")
            }
            CatalogError::Upload(_) => AppError::internal("Failed to store upload"),
            CatalogError::Internal(_) => AppError::internal("Internal server error"),
            CatalogError::ProfileExists => AppError::conflict(self.to_string())
                .with_action("Use PUT /api/profile to change it"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Database(e) => tracing::error!(error = %e, "Catalog database error"),
            CatalogError::Upload(e) => tracing::error!(error = %e, "Catalog upload error"),
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error")
            }
            CatalogError::NotOwner => tracing::warn!("Profile access outside own account"),
            CatalogError::Banned => tracing::warn!("Profile access for banned email"),
            _ => tracing::debug!(error = %self, "Catalog error"),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for CatalogError {
    fn from(err: AppError) -> Self {
        if err.kind() == ErrorKind::PayloadTooLarge {
            CatalogError::UploadTooLarge
        } else if err.is_client_error() {
            CatalogError::Validation(err.message().to_string())
        } else {
            CatalogError::Internal(err.to_string())
        }
    }
}

/// Ban lookups against the auth store
impl From<AuthError> for CatalogError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Banned => CatalogError::Banned,
            AuthError::Database(e) => CatalogError::Database(e),
            AuthError::Validation(msg) => CatalogError::Validation(msg),
            other => CatalogError::Internal(other.to_string()),
        }
    }
}

/// Profile lookups made on behalf of the auth crate
impl From<CatalogError> for AuthError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(e) => AuthError::Database(e),
            CatalogError::Validation(msg) => AuthError::Validation(msg),
            other => AuthError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(CatalogError::CourseNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(CatalogError::ProfileExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(CatalogError::NotOwner.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(CatalogError::Banned.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            CatalogError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_from_app_error() {
        let err: CatalogError = AppError::payload_too_large("too big").into();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let err: CatalogError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, CatalogError::Validation(ref m) if m == "Invalid email format"));
    }

    #[test]
    fn test_into_auth_error() {
        let err: AuthError = CatalogError::Validation("bad".into()).into();
        assert!(matches!(err, AuthError::Validation(_)));

        let err: AuthError = CatalogError::CourseNotFound.into();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_from_auth_error() {
        let err: CatalogError = AuthError::Banned.into();
        assert!(matches!(err, CatalogError::Banned));

        let err: CatalogError = AuthError::SessionInvalid.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
