//! Current User Use Case
//!
//! Returns the session identity after re-syncing its cached profile.

use std::sync::Arc;

use crate::application::authorize::AuthorizeSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::{AuthSessionRepository, BannedEmailRepository, ProfileGateway};
use crate::error::AuthResult;

pub struct CurrentUserUseCase<S, B, P>
where
    S: AuthSessionRepository,
    B: BannedEmailRepository,
    P: ProfileGateway,
{
    session_repo: Arc<S>,
    ban_repo: Arc<B>,
    profiles: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<S, B, P> CurrentUserUseCase<S, B, P>
where
    S: AuthSessionRepository,
    B: BannedEmailRepository,
    P: ProfileGateway,
{
    pub fn new(
        session_repo: Arc<S>,
        ban_repo: Arc<B>,
        profiles: Arc<P>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            session_repo,
            ban_repo,
            profiles,
            config,
        }
    }

    pub async fn execute(&self, token: Option<&str>) -> AuthResult<AuthSession> {
        let mut session = AuthorizeSessionUseCase::new(
            self.session_repo.clone(),
            self.ban_repo.clone(),
            self.config.clone(),
        )
        .execute(token)
        .await?;

        if session.is_admin {
            session.touch();
        } else {
            let profile = self.profiles.load_or_create_profile(&session.email).await?;
            session.refresh_from(&profile);
        }

        self.session_repo.update_session(&session).await?;

        Ok(session)
    }
}
