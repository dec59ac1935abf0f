//! Moderation Error Types

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::CatalogError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type ModerationResult<T> = Result<T, ModerationError>;

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("User not found")]
    UserNotFound,

    #[error("Banned user not found")]
    BanNotFound,

    #[error("Invalid id")]
    InvalidId,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ModerationError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ModerationError::UserNotFound | ModerationError::BanNotFound => ErrorKind::NotFound,
            ModerationError::InvalidId => ErrorKind::BadRequest,
            ModerationError::Auth(e) => e.kind(),
            ModerationError::Catalog(e) => e.kind(),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            ModerationError::Auth(e) => e.to_app_error(),
            ModerationError::Catalog(e) => e.to_app_error(),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }
}

impl IntoResponse for ModerationError {
    fn into_response(self) -> Response {
        match self {
            // Inner errors log themselves
            ModerationError::Auth(e) => e.into_response(),
            ModerationError::Catalog(e) => e.into_response(),
            other => {
                tracing::debug!(error = %other, "Moderation error");
                other.to_app_error().into_response()
            }
        }
    }
}
