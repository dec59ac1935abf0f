//! Auth Session Entity
//!
//! Server-side session referenced by the signed cookie. Besides identity it
//! caches a copy of the owner's profile, refreshed whenever the client asks
//! for the current user. Ban state is never cached here.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::ProfileSnapshot;
use crate::domain::value_object::{UserId, email::Email};

/// Display name recorded on admin sessions
pub const ADMIN_DISPLAY_NAME: &str = "Admin";

/// Auth session entity
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Authenticated email
    pub email: Email,
    /// Owning user; `None` for the admin account
    pub user_id: Option<UserId>,
    pub is_admin: bool,
    /// Profile snapshot
    pub name: String,
    pub selected_course: Option<Uuid>,
    pub profile_image: String,
    pub has_profile: bool,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_activity_at: DateTime<Utc>,
}

impl AuthSession {
    /// Session for a regular user, seeded from their profile
    pub fn for_user(
        user_id: UserId,
        email: Email,
        profile: &ProfileSnapshot,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            email,
            user_id: Some(user_id),
            is_admin: false,
            name: profile.name.clone(),
            selected_course: profile.selected_course,
            profile_image: profile.profile_image.clone(),
            has_profile: profile.selected_course.is_some(),
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Session for the configured admin account (no profile)
    pub fn for_admin(email: Email, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            email,
            user_id: None,
            is_admin: true,
            name: ADMIN_DISPLAY_NAME.to_string(),
            selected_course: None,
            profile_image: String::new(),
            has_profile: false,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Overwrite the cached profile fields
    pub fn refresh_from(&mut self, profile: &ProfileSnapshot) {
        self.name = profile.name.clone();
        self.selected_course = profile.selected_course;
        self.profile_image = profile.profile_image.clone();
        self.has_profile = profile.selected_course.is_some();
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(course: Option<Uuid>) -> ProfileSnapshot {
        ProfileSnapshot {
            name: "Ada".to_string(),
            selected_course: course,
            profile_image: "/uploads/1.png".to_string(),
        }
    }

    #[test]
    fn test_user_session_copies_profile() {
        let email = Email::new("a@x.com").unwrap();
        let course = Uuid::new_v4();
        let session = AuthSession::for_user(
            UserId::new(),
            email,
            &snapshot(Some(course)),
            Duration::hours(24),
        );

        assert!(!session.is_admin);
        assert!(session.has_profile);
        assert_eq!(session.selected_course, Some(course));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_refresh_clears_has_profile_when_course_gone() {
        let email = Email::new("a@x.com").unwrap();
        let mut session = AuthSession::for_user(
            UserId::new(),
            email,
            &snapshot(Some(Uuid::new_v4())),
            Duration::hours(24),
        );

        session.refresh_from(&snapshot(None));
        assert!(!session.has_profile);
        assert_eq!(session.selected_course, None);
    }

    #[test]
    fn test_admin_session() {
        let session =
            AuthSession::for_admin(Email::new("admin@x.com").unwrap(), Duration::hours(1));
        assert!(session.is_admin);
        assert!(session.user_id.is_none());
        assert_eq!(session.name, ADMIN_DISPLAY_NAME);
    }

    #[test]
    fn test_negative_ttl_is_expired() {
        let session =
            AuthSession::for_admin(Email::new("admin@x.com").unwrap(), Duration::seconds(-1));
        assert!(session.is_expired());
    }
}
