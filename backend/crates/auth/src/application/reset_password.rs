//! Reset Password Use Case
//!
//! Consumes a pending OTP and sets a new password.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AuthSessionRepository, OtpRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct ResetPasswordInput {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<U, S, O>
where
    U: UserRepository,
    S: AuthSessionRepository,
    O: OtpRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    otp_repo: Arc<O>,
    config: Arc<AuthConfig>,
}

impl<U, S, O> ResetPasswordUseCase<U, S, O>
where
    U: UserRepository,
    S: AuthSessionRepository,
    O: OtpRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        otp_repo: Arc<O>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            otp_repo,
            config,
        }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        if input.otp.trim().is_empty() {
            return Err(AuthError::Validation("Missing required fields".to_string()));
        }
        let email = Email::new(&input.email)?;
        let raw_password = RawPassword::new(input.new_password)?;

        self.otp_repo
            .consume_otp(&email, &input.otp, Utc::now().timestamp_millis())
            .await?;

        let user = self
            .user_repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        if !self.user_repo.update_password(&user.user_id, &password_hash).await? {
            return Err(AuthError::UserNotFound);
        }

        // Old sessions were authenticated with the old password
        let revoked = self.session_repo.delete_sessions_for_email(&email).await?;

        tracing::info!(user_id = %user.user_id, sessions_revoked = revoked, "Password reset");

        Ok(())
    }
}
