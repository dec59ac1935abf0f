//! Authorize Session Use Case
//!
//! Resolves a cookie token to a live session. Every session-bearing route
//! goes through here, so a ban takes effect on the next request the banned
//! client makes.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::{AuthSessionRepository, BannedEmailRepository};
use crate::error::{AuthError, AuthResult};

pub struct AuthorizeSessionUseCase<S, B>
where
    S: AuthSessionRepository,
    B: BannedEmailRepository,
{
    session_repo: Arc<S>,
    ban_repo: Arc<B>,
    config: Arc<AuthConfig>,
}

impl<S, B> AuthorizeSessionUseCase<S, B>
where
    S: AuthSessionRepository,
    B: BannedEmailRepository,
{
    pub fn new(session_repo: Arc<S>, ban_repo: Arc<B>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            ban_repo,
            config,
        }
    }

    pub async fn execute(&self, token: Option<&str>) -> AuthResult<AuthSession> {
        let token = token.ok_or(AuthError::SessionInvalid)?;
        let session_id = session_token::verify(&self.config.session_secret, token)?;

        let session = self
            .session_repo
            .find_session(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete_session(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        if !session.is_admin && self.ban_repo.is_banned(&session.email).await? {
            self.session_repo.delete_session(session_id).await?;
            tracing::warn!(
                email = %session.email,
                session_id = %session_id,
                "Session of banned email destroyed"
            );
            return Err(AuthError::Banned);
        }

        Ok(session)
    }
}
