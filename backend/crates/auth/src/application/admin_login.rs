//! Admin Login Use Case
//!
//! The admin account is a configured credential pair, not a user row.

use std::sync::Arc;

use platform::crypto::constant_time_eq;

use crate::application::config::AuthConfig;
use crate::application::login::LoginOutput;
use crate::application::session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::AuthSessionRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct AdminLoginUseCase<S>
where
    S: AuthSessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> AdminLoginUseCase<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, email: &str, password: &str) -> AuthResult<LoginOutput> {
        let admin = self.config.admin.as_ref().ok_or_else(|| {
            tracing::warn!("Admin login attempted but no admin account is configured");
            AuthError::InvalidCredentials
        })?;

        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;
        let admin_email = Email::new(&admin.email)?;

        // Evaluate both so timing does not reveal which one failed
        let email_ok = constant_time_eq(email.as_str().as_bytes(), admin_email.as_str().as_bytes());
        let password_ok = constant_time_eq(password.trim().as_bytes(), admin.password.as_bytes());

        if !(email_ok && password_ok) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = AuthSession::for_admin(admin_email, self.config.session_ttl_chrono());
        self.session_repo.create_session(&session).await?;

        let session_token = session_token::sign(&self.config.session_secret, session.session_id)?;

        tracing::info!(session_id = %session.session_id, "Admin logged in");

        Ok(LoginOutput {
            session_token,
            session,
        })
    }
}
