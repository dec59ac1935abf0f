//! API DTOs (Data Transfer Objects)
//!
//! Missing fields deserialize to empty strings so the use cases report them
//! with the regular validation messages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::auth_session::AuthSession;

// ============================================================================
// Credentials
// ============================================================================

/// Register, login, and admin login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Password reset
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOtpRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

// ============================================================================
// Session
// ============================================================================

/// Session identity with the cached profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserResponse {
    pub email: String,
    pub name: String,
    pub selected_course: Option<Uuid>,
    pub profile_image: String,
    pub is_admin: bool,
    pub has_profile: bool,
}

impl From<&AuthSession> for SessionUserResponse {
    fn from(session: &AuthSession) -> Self {
        Self {
            email: session.email.to_string(),
            name: session.name.clone(),
            selected_course: session.selected_course,
            profile_image: session.profile_image.clone(),
            is_admin: session.is_admin,
            has_profile: session.has_profile,
        }
    }
}
