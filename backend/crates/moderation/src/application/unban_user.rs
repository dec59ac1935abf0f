//! Unban User Use Case

use std::sync::Arc;

use auth::domain::entity::banned_email::BannedEmail;
use auth::domain::repository::BannedEmailRepository;
use kernel::id::BannedEmailId;

use crate::error::{ModerationError, ModerationResult};

pub struct UnbanUserUseCase<B>
where
    B: BannedEmailRepository,
{
    ban_repo: Arc<B>,
}

impl<B> UnbanUserUseCase<B>
where
    B: BannedEmailRepository,
{
    pub fn new(ban_repo: Arc<B>) -> Self {
        Self { ban_repo }
    }

    /// Lift the ban; the deleted account is not recreated
    pub async fn execute(&self, id: &BannedEmailId) -> ModerationResult<BannedEmail> {
        let ban = self
            .ban_repo
            .delete_ban(id)
            .await?
            .ok_or(ModerationError::BanNotFound)?;

        tracing::info!(ban_id = %ban.id, email = %ban.email, "Email unbanned");

        Ok(ban)
    }
}
