//! Login Use Case
//!
//! Authenticates a user and creates a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::{
    AuthSessionRepository, BannedEmailRepository, ProfileGateway, UserRepository,
};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    /// Session token for cookie
    pub session_token: String,
    pub session: AuthSession,
}

/// Login use case
pub struct LoginUseCase<U, B, S, P>
where
    U: UserRepository,
    B: BannedEmailRepository,
    S: AuthSessionRepository,
    P: ProfileGateway,
{
    user_repo: Arc<U>,
    ban_repo: Arc<B>,
    session_repo: Arc<S>,
    profiles: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<U, B, S, P> LoginUseCase<U, B, S, P>
where
    U: UserRepository,
    B: BannedEmailRepository,
    S: AuthSessionRepository,
    P: ProfileGateway,
{
    pub fn new(
        user_repo: Arc<U>,
        ban_repo: Arc<B>,
        session_repo: Arc<S>,
        profiles: Arc<P>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            ban_repo,
            session_repo,
            profiles,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Malformed input cannot match an account
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        // Ban wins over everything, including a correct password
        if self.ban_repo.is_banned(&email).await? {
            tracing::warn!(email = %email, "Banned email attempted to log in");
            return Err(AuthError::Banned);
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = self.profiles.load_or_create_profile(&user.email).await?;

        let session = AuthSession::for_user(
            user.user_id,
            user.email.clone(),
            &profile,
            self.config.session_ttl_chrono(),
        );
        self.session_repo.create_session(&session).await?;

        let session_token = session_token::sign(&self.config.session_secret, session.session_id)?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            session_token,
            session,
        })
    }
}
