//! Banned Email Entity
//!
//! A row here blocks the email from authenticating, whether or not a user
//! with that email still exists.

use chrono::{DateTime, Utc};
use kernel::id::BannedEmailId;

use crate::domain::value_object::email::Email;

#[derive(Debug, Clone)]
pub struct BannedEmail {
    pub id: BannedEmailId,
    pub email: Email,
    pub banned_at: DateTime<Utc>,
}

impl BannedEmail {
    pub fn new(email: Email) -> Self {
        Self {
            id: BannedEmailId::new(),
            email,
            banned_at: Utc::now(),
        }
    }
}
