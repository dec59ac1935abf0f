//! In-Memory Repository Implementations
//!
//! Same semantics as the PostgreSQL repository, kept in process. Backs the
//! test suites of this crate and of the crates layered on top of it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::BannedEmailId;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, banned_email::BannedEmail, user::User};
use crate::domain::repository::{AuthSessionRepository, BannedEmailRepository, UserRepository};
use crate::domain::value_object::{UserId, email::Email, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    users: Arc<RwLock<Vec<User>>>,
    bans: Arc<RwLock<Vec<BannedEmail>>>,
    sessions: Arc<RwLock<HashMap<Uuid, AuthSession>>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live session rows (expired ones included)
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| &u.user_id == user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }

    async fn update_password(&self, user_id: &UserId, hash: &UserPassword) -> AuthResult<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| &u.user_id == user_id) {
            Some(user) => {
                user.set_password(hash.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| &u.user_id != user_id);
        Ok(users.len() < before)
    }

    async fn list_users(&self) -> AuthResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }
}

impl BannedEmailRepository for InMemoryAuthRepository {
    async fn is_banned(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.bans.read().await.iter().any(|b| &b.email == email))
    }

    async fn insert_ban_if_absent(&self, ban: &BannedEmail) -> AuthResult<BannedEmail> {
        let mut bans = self.bans.write().await;
        if let Some(existing) = bans.iter().find(|b| b.email == ban.email) {
            return Ok(existing.clone());
        }
        bans.push(ban.clone());
        Ok(ban.clone())
    }

    async fn delete_ban(&self, id: &BannedEmailId) -> AuthResult<Option<BannedEmail>> {
        let mut bans = self.bans.write().await;
        let position = bans.iter().position(|b| &b.id == id);
        Ok(position.map(|i| bans.remove(i)))
    }

    async fn list_bans(&self) -> AuthResult<Vec<BannedEmail>> {
        let mut bans = self.bans.read().await.clone();
        bans.sort_by(|a, b| b.banned_at.cmp(&a.banned_at));
        Ok(bans)
    }
}

impl AuthSessionRepository for InMemoryAuthRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn update_session(&self, session: &AuthSession) -> AuthResult<()> {
        if let Some(stored) = self.sessions.write().await.get_mut(&session.session_id) {
            *stored = session.clone();
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }

    async fn delete_sessions_for_email(&self, email: &Email) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.is_admin || &s.email != email);
        Ok((before - sessions.len()) as u64)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        Ok((before - sessions.len()) as u64)
    }
}
