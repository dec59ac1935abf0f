//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure
//! layer; the profile port is implemented by the catalog crate.

use kernel::id::BannedEmailId;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession, banned_email::BannedEmail, otp::OtpCode, user::User,
};
use crate::domain::value_object::{UserId, email::Email, user_password::UserPassword};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user; fails with `EmailTaken` on a duplicate email
    async fn insert_user(&self, user: &User) -> AuthResult<()>;

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Replace the stored hash; returns false if the user is gone
    async fn update_password(&self, user_id: &UserId, hash: &UserPassword) -> AuthResult<bool>;

    /// Returns false if nothing was deleted
    async fn delete_user(&self, user_id: &UserId) -> AuthResult<bool>;

    /// All users, oldest first
    async fn list_users(&self) -> AuthResult<Vec<User>>;
}

/// Ban list repository trait
#[trait_variant::make(BannedEmailRepository: Send)]
pub trait LocalBannedEmailRepository {
    async fn is_banned(&self, email: &Email) -> AuthResult<bool>;

    /// Insert unless a ban for the email already exists; returns the live row
    async fn insert_ban_if_absent(&self, ban: &BannedEmail) -> AuthResult<BannedEmail>;

    /// Returns the removed row, if any
    async fn delete_ban(&self, id: &BannedEmailId) -> AuthResult<Option<BannedEmail>>;

    /// All bans, most recent first
    async fn list_bans(&self) -> AuthResult<Vec<BannedEmail>>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()>;

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    /// Persist the cached profile fields and activity timestamp
    async fn update_session(&self, session: &AuthSession) -> AuthResult<()>;

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()>;

    /// Drop every session of an email (password reset, ban)
    async fn delete_sessions_for_email(&self, email: &Email) -> AuthResult<u64>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Pending password-reset codes, one per email
#[trait_variant::make(OtpRepository: Send)]
pub trait LocalOtpRepository {
    /// Store, replacing any pending code for the email
    async fn put_otp(&self, email: &Email, otp: OtpCode) -> AuthResult<()>;

    /// Check and remove the pending code in one step, so a code is accepted
    /// at most once. A wrong code leaves the entry in place; an expired one
    /// is dropped.
    async fn consume_otp(&self, email: &Email, code: &str, now_ms: i64) -> AuthResult<()>;
}

/// What a session caches from the profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub name: String,
    /// `None` when unset or when the course no longer exists
    pub selected_course: Option<Uuid>,
    pub profile_image: String,
}

/// Port to the profile store
#[trait_variant::make(ProfileGateway: Send)]
pub trait LocalProfileGateway {
    /// Read the profile, creating the default one if it does not exist
    async fn load_or_create_profile(&self, email: &Email) -> AuthResult<ProfileSnapshot>;
}

/// Everything the auth routes and the session middleware need from storage
pub trait AuthStore:
    UserRepository + BannedEmailRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository
        + BannedEmailRepository
        + AuthSessionRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
