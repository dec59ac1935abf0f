//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::BannedEmailId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, banned_email::BannedEmail, user::User};
use crate::domain::repository::{AuthSessionRepository, BannedEmailRepository, UserRepository};
use crate::domain::value_object::{UserId, email::Email, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AuthError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update_password(&self, user_id: &UserId, hash: &UserPassword) -> AuthResult<bool> {
        let updated = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .bind(hash.as_phc_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_user(&self, user_id: &UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_users(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_user()).collect()
    }
}

// ============================================================================
// Banned Email Repository Implementation
// ============================================================================

impl BannedEmailRepository for PgAuthRepository {
    async fn is_banned(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM banned_emails WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_ban_if_absent(&self, ban: &BannedEmail) -> AuthResult<BannedEmail> {
        sqlx::query(
            r#"
            INSERT INTO banned_emails (id, email, banned_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(ban.id.as_uuid())
        .bind(ban.email.as_str())
        .bind(ban.banned_at)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, BannedEmailRow>(
            "SELECT id, email, banned_at FROM banned_emails WHERE email = $1",
        )
        .bind(ban.email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_ban())
    }

    async fn delete_ban(&self, id: &BannedEmailId) -> AuthResult<Option<BannedEmail>> {
        let row = sqlx::query_as::<_, BannedEmailRow>(
            "DELETE FROM banned_emails WHERE id = $1 RETURNING id, email, banned_at",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BannedEmailRow::into_ban))
    }

    async fn list_bans(&self) -> AuthResult<Vec<BannedEmail>> {
        let rows = sqlx::query_as::<_, BannedEmailRow>(
            "SELECT id, email, banned_at FROM banned_emails ORDER BY banned_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BannedEmailRow::into_ban).collect())
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for PgAuthRepository {
    async fn create_session(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                email,
                user_id,
                is_admin,
                name,
                selected_course,
                profile_image,
                has_profile,
                expires_at_ms,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(session.session_id)
        .bind(session.email.as_str())
        .bind(session.user_id.map(|id| id.into_uuid()))
        .bind(session.is_admin)
        .bind(&session.name)
        .bind(session.selected_course)
        .bind(&session.profile_image)
        .bind(session.has_profile)
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT
                session_id,
                email,
                user_id,
                is_admin,
                name,
                selected_course,
                profile_image,
                has_profile,
                expires_at_ms,
                created_at,
                last_activity_at
            FROM auth_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AuthSessionRow::into_session))
    }

    async fn update_session(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE auth_sessions SET
                name = $2,
                selected_course = $3,
                profile_image = $4,
                has_profile = $5,
                last_activity_at = $6
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(&session.name)
        .bind(session.selected_course)
        .bind(&session.profile_image)
        .bind(session.has_profile)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_sessions_for_email(&self, email: &Email) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE email = $1 AND NOT is_admin")
            .bind(email.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BannedEmailRow {
    id: Uuid,
    email: String,
    banned_at: DateTime<Utc>,
}

impl BannedEmailRow {
    fn into_ban(self) -> BannedEmail {
        BannedEmail {
            id: BannedEmailId::from_uuid(self.id),
            email: Email::from_db(self.email),
            banned_at: self.banned_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    email: String,
    user_id: Option<Uuid>,
    is_admin: bool,
    name: String,
    selected_course: Option<Uuid>,
    profile_image: String,
    has_profile: bool,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            email: Email::from_db(self.email),
            user_id: self.user_id.map(UserId::from_uuid),
            is_admin: self.is_admin,
            name: self.name,
            selected_course: self.selected_course,
            profile_image: self.profile_image,
            has_profile: self.has_profile,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}
