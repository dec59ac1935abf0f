//! Auth use case and router tests, backed by the in-memory stores

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::application::config::AuthConfig;
use crate::domain::repository::{ProfileGateway, ProfileSnapshot};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

const ADMIN_EMAIL: &str = "admin@lms.test";
const ADMIN_PASSWORD: &str = "admin-secret";

/// Profile port that materializes default profiles in a map
#[derive(Clone, Default)]
struct StubProfiles {
    profiles: Arc<RwLock<HashMap<String, ProfileSnapshot>>>,
    created: Arc<AtomicUsize>,
    fail: bool,
}

impl StubProfiles {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    async fn set(&self, email: &str, snapshot: ProfileSnapshot) {
        self.profiles.write().await.insert(email.to_string(), snapshot);
    }

    async fn get(&self, email: &str) -> Option<ProfileSnapshot> {
        self.profiles.read().await.get(email).cloned()
    }
}

impl ProfileGateway for StubProfiles {
    async fn load_or_create_profile(&self, email: &Email) -> AuthResult<ProfileSnapshot> {
        if self.fail {
            return Err(AuthError::Internal("profile store down".to_string()));
        }
        let mut profiles = self.profiles.write().await;
        let snapshot = profiles.entry(email.to_string()).or_insert_with(|| {
            self.created.fetch_add(1, Ordering::SeqCst);
            ProfileSnapshot {
                name: "Default Name".to_string(),
                selected_course: None,
                profile_image: "default-profile.png".to_string(),
            }
        });
        Ok(snapshot.clone())
    }
}

fn test_config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig::development().with_admin(ADMIN_EMAIL, ADMIN_PASSWORD))
}

mod use_case_tests {
    use super::*;
    use chrono::Utc;
    use platform::mail::{MailOutbox, Mailer};
    use uuid::Uuid;

    use crate::application::request_otp::code_from_message;
    use crate::application::*;
    use crate::domain::entity::{banned_email::BannedEmail, otp::OtpCode};
    use crate::domain::repository::{
        AuthSessionRepository, BannedEmailRepository, OtpRepository, UserRepository,
    };
    use crate::infra::{InMemoryAuthRepository, InMemoryOtpStore};

    struct Harness {
        repo: Arc<InMemoryAuthRepository>,
        profiles: Arc<StubProfiles>,
        otp: Arc<InMemoryOtpStore>,
        mailer: Arc<Mailer>,
        outbox: MailOutbox,
        config: Arc<AuthConfig>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_profiles(StubProfiles::default())
        }

        fn with_profiles(profiles: StubProfiles) -> Self {
            let (mailer, outbox) = Mailer::outbox("noreply@lms.test");
            Self {
                repo: Arc::new(InMemoryAuthRepository::new()),
                profiles: Arc::new(profiles),
                otp: Arc::new(InMemoryOtpStore::new()),
                mailer: Arc::new(mailer),
                outbox,
                config: test_config(),
            }
        }

        async fn register(&self, email: &str, password: &str) -> AuthResult<()> {
            RegisterUseCase::new(
                self.repo.clone(),
                self.repo.clone(),
                self.profiles.clone(),
                self.config.clone(),
            )
            .execute(RegisterInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map(|_| ())
        }

        async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutput> {
            LoginUseCase::new(
                self.repo.clone(),
                self.repo.clone(),
                self.repo.clone(),
                self.profiles.clone(),
                self.config.clone(),
            )
            .execute(LoginInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
        }

        async fn current_user(&self, token: &str) -> AuthResult<crate::AuthSession> {
            CurrentUserUseCase::new(
                self.repo.clone(),
                self.repo.clone(),
                self.profiles.clone(),
                self.config.clone(),
            )
            .execute(Some(token))
            .await
        }

        async fn request_otp(&self, email: &str) -> AuthResult<()> {
            RequestOtpUseCase::new(
                self.repo.clone(),
                self.otp.clone(),
                self.mailer.clone(),
                self.config.clone(),
            )
            .execute(email)
            .await
        }

        async fn reset(&self, email: &str, otp: &str, password: &str) -> AuthResult<()> {
            ResetPasswordUseCase::new(
                self.repo.clone(),
                self.repo.clone(),
                self.otp.clone(),
                self.config.clone(),
            )
            .execute(ResetPasswordInput {
                email: email.to_string(),
                otp: otp.to_string(),
                new_password: password.to_string(),
            })
            .await
        }

        async fn last_code(&self, email: &str) -> String {
            let message = self.outbox.last_to(email).await.unwrap();
            code_from_message(&message.text).unwrap().to_string()
        }

        async fn ban(&self, email: &str) {
            let ban = BannedEmail::new(Email::new(email).unwrap());
            self.repo.insert_ban_if_absent(&ban).await.unwrap();
        }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_register_twice_conflicts_after_normalization() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();

        let second = h.register("  A@X.com ", "another1").await;
        assert!(matches!(second, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_register_creates_default_profile() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();

        let profile = h.profiles.get("a@x.com").await.unwrap();
        assert_eq!(profile.name, "Default Name");
        assert_eq!(profile.profile_image, "default-profile.png");
        assert_eq!(profile.selected_course, None);

        // Logging in reads the same profile instead of creating another
        h.login("a@x.com", "secret1").await.unwrap();
        assert_eq!(h.profiles.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let h = Harness::new();
        assert!(matches!(
            h.register("not-an-email", "secret1").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            h.register("a@x.com", "12345").await,
            Err(AuthError::Validation(_))
        ));
        assert!(h.repo.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_rolls_back_when_profile_fails() {
        let h = Harness::with_profiles(StubProfiles::failing());
        assert!(h.register("a@x.com", "secret1").await.is_err());
        assert!(h.repo.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_banned_email_rejected() {
        let h = Harness::new();
        h.ban("a@x.com").await;
        assert!(matches!(
            h.register("a@x.com", "secret1").await,
            Err(AuthError::Banned)
        ));
    }

    // ------------------------------------------------------------------------
    // Login
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_issues_session() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();

        let output = h.login("A@x.com", "secret1").await.unwrap();
        assert_eq!(output.session.email.as_str(), "a@x.com");
        assert!(!output.session.is_admin);
        assert!(!output.session.has_profile);
        assert_eq!(h.repo.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_login_wrong_password_or_unknown_user() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();

        assert!(matches!(
            h.login("a@x.com", "secret2").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            h.login("nobody@x.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            h.login("a@x.com", "").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_banned_even_with_correct_password() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        h.ban("a@x.com").await;

        assert!(matches!(
            h.login("a@x.com", "secret1").await,
            Err(AuthError::Banned)
        ));
        assert_eq!(h.repo.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_admin_login() {
        let h = Harness::new();
        let use_case = AdminLoginUseCase::new(h.repo.clone(), h.config.clone());

        let output = use_case.execute(" Admin@LMS.test ", ADMIN_PASSWORD).await.unwrap();
        assert!(output.session.is_admin);
        assert!(output.session.user_id.is_none());

        assert!(matches!(
            use_case.execute(ADMIN_EMAIL, "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_admin_login_without_configured_admin() {
        let h = Harness::new();
        let config = Arc::new(AuthConfig::development());
        let use_case = AdminLoginUseCase::new(h.repo.clone(), config);

        assert!(matches!(
            use_case.execute(ADMIN_EMAIL, ADMIN_PASSWORD).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    // ------------------------------------------------------------------------
    // Current user / session
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_current_user_refreshes_profile_snapshot() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        let output = h.login("a@x.com", "secret1").await.unwrap();

        let course = Uuid::new_v4();
        h.profiles
            .set(
                "a@x.com",
                ProfileSnapshot {
                    name: "Ada".to_string(),
                    selected_course: Some(course),
                    profile_image: "/uploads/1.png".to_string(),
                },
            )
            .await;

        let session = h.current_user(&output.session_token).await.unwrap();
        assert_eq!(session.name, "Ada");
        assert_eq!(session.selected_course, Some(course));
        assert!(session.has_profile);

        let stored = h
            .repo
            .find_session(output.session.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "Ada");
    }

    #[tokio::test]
    async fn test_ban_takes_effect_on_live_session() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        let output = h.login("a@x.com", "secret1").await.unwrap();

        h.ban("a@x.com").await;

        assert!(matches!(
            h.current_user(&output.session_token).await,
            Err(AuthError::Banned)
        ));
        // Session was destroyed along the way
        assert!(matches!(
            h.current_user(&output.session_token).await,
            Err(AuthError::SessionInvalid)
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthenticated() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        let output = h.login("a@x.com", "secret1").await.unwrap();

        let mut session = output.session.clone();
        session.expires_at_ms = Utc::now().timestamp_millis() - 1;
        h.repo.delete_session(session.session_id).await.unwrap();
        h.repo.create_session(&session).await.unwrap();

        assert!(matches!(
            h.current_user(&output.session_token).await,
            Err(AuthError::SessionInvalid)
        ));
        assert_eq!(h.repo.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let h = Harness::new();
        let forged = format!("{}.AAAA", Uuid::new_v4());
        assert!(matches!(
            h.current_user(&forged).await,
            Err(AuthError::SessionInvalid)
        ));
    }

    #[tokio::test]
    async fn test_logout_destroys_session() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        let output = h.login("a@x.com", "secret1").await.unwrap();

        LogoutUseCase::new(h.repo.clone(), h.config.clone())
            .execute(Some(&output.session_token))
            .await
            .unwrap();

        assert!(matches!(
            h.current_user(&output.session_token).await,
            Err(AuthError::SessionInvalid)
        ));
    }

    // ------------------------------------------------------------------------
    // OTP
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_password_reset_scenario() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        h.login("a@x.com", "secret1").await.unwrap();

        h.request_otp("a@x.com").await.unwrap();
        let code = h.last_code("a@x.com").await;
        assert_eq!(code.len(), 6);

        h.reset("a@x.com", &code, "newpass1").await.unwrap();

        assert!(matches!(
            h.login("a@x.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(h.login("a@x.com", "newpass1").await.is_ok());
    }

    #[tokio::test]
    async fn test_otp_is_single_use() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        h.request_otp("a@x.com").await.unwrap();
        let code = h.last_code("a@x.com").await;

        h.reset("a@x.com", &code, "newpass1").await.unwrap();
        assert!(matches!(
            h.reset("a@x.com", &code, "newpass2").await,
            Err(AuthError::OtpNotFound)
        ));
    }

    #[tokio::test]
    async fn test_newer_otp_invalidates_older() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();

        h.request_otp("a@x.com").await.unwrap();
        let first = h.last_code("a@x.com").await;
        h.request_otp("a@x.com").await.unwrap();
        let second = h.last_code("a@x.com").await;

        if first != second {
            assert!(matches!(
                h.reset("a@x.com", &first, "newpass1").await,
                Err(AuthError::InvalidOtp)
            ));
        }
        h.reset("a@x.com", &second, "newpass1").await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_otp_is_removed() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        let email = Email::new("a@x.com").unwrap();
        let past = Utc::now().timestamp_millis() - 1;
        h.otp.put_otp(&email, OtpCode::new("123456", past)).await.unwrap();

        assert!(matches!(
            h.reset("a@x.com", "123456", "newpass1").await,
            Err(AuthError::OtpExpired)
        ));
        assert!(h.otp.pending(&email).await.is_none());
        assert!(h.login("a@x.com", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_code_keeps_pending_otp() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        let email = Email::new("a@x.com").unwrap();
        let future = Utc::now().timestamp_millis() + 60_000;
        h.otp.put_otp(&email, OtpCode::new("123456", future)).await.unwrap();

        assert!(matches!(
            h.reset("a@x.com", "654321", "newpass1").await,
            Err(AuthError::InvalidOtp)
        ));
        h.reset("a@x.com", "123456", "newpass1").await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resets_with_one_code() {
        let h = Arc::new(Harness::new());
        h.register("a@x.com", "secret1").await.unwrap();
        h.request_otp("a@x.com").await.unwrap();
        let code = h.last_code("a@x.com").await;

        let handles: Vec<_> = ["newpass1", "newpass2"]
            .into_iter()
            .map(|password| {
                let h = h.clone();
                let code = code.clone();
                tokio::spawn(async move { h.reset("a@x.com", &code, password).await })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => succeeded += 1,
                Err(e) => assert!(matches!(e, AuthError::OtpNotFound)),
            }
        }
        assert_eq!(succeeded, 1);
    }

    #[tokio::test]
    async fn test_request_otp_unknown_user() {
        let h = Harness::new();
        assert!(matches!(
            h.request_otp("ghost@x.com").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(h.outbox.messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_mail_failure_still_stores_code() {
        let mut h = Harness::new();
        h.mailer = Arc::new(Mailer::relay("http://127.0.0.1:1/send", "noreply@lms.test"));
        h.register("a@x.com", "secret1").await.unwrap();

        h.request_otp("a@x.com").await.unwrap();

        let email = Email::new("a@x.com").unwrap();
        assert!(h.otp.pending(&email).await.is_some());
    }

    #[tokio::test]
    async fn test_reset_revokes_existing_sessions() {
        let h = Harness::new();
        h.register("a@x.com", "secret1").await.unwrap();
        let output = h.login("a@x.com", "secret1").await.unwrap();

        h.request_otp("a@x.com").await.unwrap();
        let code = h.last_code("a@x.com").await;
        h.reset("a@x.com", &code, "newpass1").await.unwrap();

        assert!(matches!(
            h.current_user(&output.session_token).await,
            Err(AuthError::SessionInvalid)
        ));
    }

    #[tokio::test]
    async fn test_reset_requires_all_fields() {
        let h = Harness::new();
        assert!(matches!(
            h.reset("a@x.com", "", "newpass1").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            h.reset("a@x.com", "123456", "").await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unban_leaves_account_gone() {
        let h = Harness::new();
        h.register("b@x.com", "secret1").await.unwrap();
        let user = h
            .repo
            .find_user_by_email(&Email::new("b@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();

        h.ban("b@x.com").await;
        h.repo.delete_user(&user.user_id).await.unwrap();
        assert!(matches!(h.login("b@x.com", "secret1").await, Err(AuthError::Banned)));

        let ban = h.repo.list_bans().await.unwrap().remove(0);
        h.repo.delete_ban(&ban.id).await.unwrap();
        assert!(matches!(
            h.login("b@x.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}

mod router_tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use platform::mail::Mailer;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::entity::banned_email::BannedEmail;
    use crate::domain::repository::BannedEmailRepository;
    use crate::infra::{InMemoryAuthRepository, InMemoryOtpStore};
    use crate::presentation::middleware::{SessionGuard, require_admin, require_session};
    use crate::presentation::router::auth_router_generic;

    fn app(repo: InMemoryAuthRepository, config: Arc<AuthConfig>) -> Router {
        auth_router_generic(
            repo,
            StubProfiles::default(),
            Arc::new(InMemoryOtpStore::new()),
            Mailer::log_only("noreply@lms.test"),
            config,
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` part of the Set-Cookie header
    fn session_cookie(response: &axum::response::Response) -> String {
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    async fn register_and_login(app: &Router, email: &str) -> String {
        let creds = json!({"email": email, "password": "secret1"});
        let response = app.clone().oneshot(post_json("/register", creds.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.clone().oneshot(post_json("/login", creds)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        session_cookie(&response)
    }

    #[tokio::test]
    async fn test_register_envelope() {
        let app = app(InMemoryAuthRepository::new(), test_config());
        let response = app
            .clone()
            .oneshot(post_json("/register", json!({"email": "a@x.com", "password": "secret1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "User registered successfully");

        let response = app
            .oneshot(post_json("/register", json!({"email": "a@x.com", "password": "secret1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User already exists");
    }

    #[tokio::test]
    async fn test_missing_fields_are_validation_errors() {
        let app = app(InMemoryAuthRepository::new(), test_config());
        let response = app
            .oneshot(post_json("/register", json!({"email": "a@x.com"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "Password is required");
    }

    #[tokio::test]
    async fn test_login_then_current_user() {
        let app = app(InMemoryAuthRepository::new(), test_config());
        let cookie = register_and_login(&app, "a@x.com").await;
        assert!(cookie.starts_with("lms_session="));

        let response = app.oneshot(with_cookie("/current-user", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["data"]["email"], "a@x.com");
        assert_eq!(body["data"]["name"], "Default Name");
        assert_eq!(body["data"]["isAdmin"], false);
        assert_eq!(body["data"]["hasProfile"], false);
    }

    #[tokio::test]
    async fn test_current_user_without_cookie() {
        let app = app(InMemoryAuthRepository::new(), test_config());
        let response = app
            .oneshot(Request::get("/current-user").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["message"], "Not authenticated");
    }

    #[tokio::test]
    async fn test_banned_session_is_forbidden_and_cookie_cleared() {
        let repo = InMemoryAuthRepository::new();
        let app = app(repo.clone(), test_config());
        let cookie = register_and_login(&app, "a@x.com").await;

        let ban = BannedEmail::new(Email::new("a@x.com").unwrap());
        repo.insert_ban_if_absent(&ban).await.unwrap();

        let response = app.clone().oneshot(with_cookie("/current-user", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(session_cookie(&response).ends_with('='));

        let response = app
            .oneshot(post_json("/login", json!({"email": "a@x.com", "password": "secret1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["message"], "This email has been banned.");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let app = app(InMemoryAuthRepository::new(), test_config());
        let cookie = register_and_login(&app, "a@x.com").await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("Max-Age=0"));

        let response = app.oneshot(with_cookie("/current-user", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_request_otp_unknown_email_is_not_found() {
        let app = app(InMemoryAuthRepository::new(), test_config());
        let response = app
            .oneshot(post_json("/request-otp", json!({"email": "ghost@x.com"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_verify_otp_without_pending_code() {
        let app = app(InMemoryAuthRepository::new(), test_config());
        let response = app
            .oneshot(post_json(
                "/verify-otp",
                json!({"email": "a@x.com", "otp": "123456", "newPassword": "newpass1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "OTP not sent or expired");
    }

    #[tokio::test]
    async fn test_session_middleware_gates_routes() {
        let repo = InMemoryAuthRepository::new();
        let config = test_config();
        let auth = app(repo.clone(), config.clone());
        let guard = SessionGuard::new(Arc::new(repo), config);

        let protected = Router::new()
            .route("/me", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(
                guard.clone(),
                require_session::<InMemoryAuthRepository>,
            ))
            .merge(
                Router::new()
                    .route("/admin", get(|| async { "admin" }))
                    .route_layer(from_fn_with_state(
                        guard,
                        require_admin::<InMemoryAuthRepository>,
                    )),
            );

        let user_cookie = register_and_login(&auth, "a@x.com").await;
        let response = auth
            .clone()
            .oneshot(post_json(
                "/admin/login",
                json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
            ))
            .await
            .unwrap();
        let admin_cookie = session_cookie(&response);

        let anonymous = protected
            .clone()
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let me = protected.clone().oneshot(with_cookie("/me", &user_cookie)).await.unwrap();
        assert_eq!(me.status(), StatusCode::OK);

        let denied = protected.clone().oneshot(with_cookie("/admin", &user_cookie)).await.unwrap();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let allowed = protected.oneshot(with_cookie("/admin", &admin_cookie)).await.unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
    }
}
