//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AuthStore, ProfileGateway};
use crate::infra::otp_store::InMemoryOtpStore;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router<P>(
    repo: PgAuthRepository,
    profiles: P,
    otp: Arc<InMemoryOtpStore>,
    mailer: Mailer,
    config: Arc<AuthConfig>,
) -> Router
where
    P: ProfileGateway + Send + Sync + 'static,
{
    auth_router_generic(repo, profiles, otp, mailer, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R, P>(
    repo: R,
    profiles: P,
    otp: Arc<InMemoryOtpStore>,
    mailer: Mailer,
    config: Arc<AuthConfig>,
) -> Router
where
    R: AuthStore,
    P: ProfileGateway + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        profiles: Arc::new(profiles),
        otp,
        mailer: Arc::new(mailer),
        config,
    };

    Router::new()
        .route("/register", post(handlers::register::<R, P>))
        .route("/login", post(handlers::login::<R, P>))
        .route("/admin/login", post(handlers::admin_login::<R, P>))
        .route("/current-user", get(handlers::current_user::<R, P>))
        .route("/logout", post(handlers::logout::<R, P>))
        .route("/request-otp", post(handlers::request_otp::<R, P>))
        .route("/verify-otp", post(handlers::verify_otp::<R, P>))
        .with_state(state)
}
