//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Email already registered
    #[error("User already exists")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email is on the ban list
    #[error("This email has been banned.")]
    Banned,

    /// Session missing, expired, or forged
    #[error("Not authenticated")]
    SessionInvalid,

    /// Route needs an admin session
    #[error("Admin access required")]
    AdminRequired,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// No pending code for the email
    #[error("OTP not sent or expired")]
    OtpNotFound,

    /// Pending code is past its expiry
    #[error("OTP has expired")]
    OtpExpired,

    /// Code does not match
    #[error("Invalid OTP")]
    InvalidOtp,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::InvalidOtp => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::Banned | AuthError::AdminRequired => ErrorKind::Forbidden,
            AuthError::UserNotFound | AuthError::OtpNotFound => ErrorKind::NotFound,
            AuthError::OtpExpired => ErrorKind::Gone,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            // Driver messages stay in the logs
            AuthError::Database(_) => AppError::internal("Database error"),
            AuthError::Internal(_) => AppError::internal("Internal server error"),
            AuthError::Banned => AppError::new(self.kind(), self.to_string())
                .with_action("Contact an administrator"),
            AuthError::OtpExpired | AuthError::OtpNotFound => {
                AppError::new(self.kind(), self.to_string()).with_action("Request a new code")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Banned => {
                tracing::warn!("Banned email rejected");
            }
            AuthError::InvalidOtp | AuthError::OtpExpired => {
                tracing::warn!(error = %self, "Password reset code rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            AuthError::Validation(err.message().to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}
