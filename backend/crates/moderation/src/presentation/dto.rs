//! API DTOs (Data Transfer Objects)

use auth::domain::entity::banned_email::BannedEmail;
use chrono::{DateTime, Utc};
use kernel::id::BannedEmailId;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannedEmailResponse {
    pub id: BannedEmailId,
    pub email: String,
    pub banned_at: DateTime<Utc>,
}

impl From<BannedEmail> for BannedEmailResponse {
    fn from(ban: BannedEmail) -> Self {
        Self {
            id: ban.id,
            email: ban.email.into_inner(),
            banned_at: ban.banned_at,
        }
    }
}
