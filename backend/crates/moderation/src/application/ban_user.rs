//! Ban User Use Case
//!
//! Destructive: the ban row outlives the account. The user row, the profile
//! and every session of the email are deleted and not restored on unban.

use std::sync::Arc;

use auth::domain::entity::banned_email::BannedEmail;
use auth::domain::repository::{AuthSessionRepository, BannedEmailRepository, UserRepository};
use catalog::domain::repository::ProfileRepository;
use kernel::id::UserId;

use crate::error::{ModerationError, ModerationResult};

pub struct BanUserUseCase<U, B, S, P>
where
    U: UserRepository,
    B: BannedEmailRepository,
    S: AuthSessionRepository,
    P: ProfileRepository,
{
    user_repo: Arc<U>,
    ban_repo: Arc<B>,
    session_repo: Arc<S>,
    profile_repo: Arc<P>,
}

impl<U, B, S, P> BanUserUseCase<U, B, S, P>
where
    U: UserRepository,
    B: BannedEmailRepository,
    S: AuthSessionRepository,
    P: ProfileRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        ban_repo: Arc<B>,
        session_repo: Arc<S>,
        profile_repo: Arc<P>,
    ) -> Self {
        Self {
            user_repo,
            ban_repo,
            session_repo,
            profile_repo,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> ModerationResult<BannedEmail> {
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(ModerationError::UserNotFound)?;

        // Ban first: a failure below leaves a banned email, never a free one
        let ban = self
            .ban_repo
            .insert_ban_if_absent(&BannedEmail::new(user.email.clone()))
            .await?;

        self.user_repo.delete_user(&user.user_id).await?;
        let had_profile = self.profile_repo.delete_profile(&user.email).await?;
        let sessions = self
            .session_repo
            .delete_sessions_for_email(&user.email)
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            had_profile,
            sessions,
            "User banned and deleted"
        );

        Ok(ban)
    }
}
