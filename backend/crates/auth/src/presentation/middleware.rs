//! Session Middleware
//!
//! `require_session` and `require_admin` resolve the session cookie once per
//! request, re-check the ban list, and hand the session to handlers through
//! the `CurrentSession` extension.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::AuthorizeSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::{AuthSessionRepository, BannedEmailRepository};
use crate::error::AuthError;

/// Middleware state
pub struct SessionGuard<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> SessionGuard<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for SessionGuard<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Authenticated session, inserted into request extensions
#[derive(Debug, Clone)]
pub struct CurrentSession(pub AuthSession);

/// Middleware that requires a valid, unbanned session
pub async fn require_session<R>(
    State(guard): State<SessionGuard<R>>,
    req: Request,
    next: Next,
) -> Result<Response, Response>
where
    R: AuthSessionRepository + BannedEmailRepository + Send + Sync + 'static,
{
    authorize(guard, req, next, false).await
}

/// Middleware that requires an admin session
pub async fn require_admin<R>(
    State(guard): State<SessionGuard<R>>,
    req: Request,
    next: Next,
) -> Result<Response, Response>
where
    R: AuthSessionRepository + BannedEmailRepository + Send + Sync + 'static,
{
    authorize(guard, req, next, true).await
}

async fn authorize<R>(
    guard: SessionGuard<R>,
    mut req: Request,
    next: Next,
    admin_only: bool,
) -> Result<Response, Response>
where
    R: AuthSessionRepository + BannedEmailRepository + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &guard.config.session_cookie_name);

    let use_case =
        AuthorizeSessionUseCase::new(guard.repo.clone(), guard.repo.clone(), guard.config.clone());

    let session = use_case
        .execute(token.as_deref())
        .await
        .map_err(|e| rejection(&guard.config, e))?;

    if admin_only && !session.is_admin {
        return Err(AuthError::AdminRequired.into_response());
    }

    req.extensions_mut().insert(CurrentSession(session));

    Ok(next.run(req).await)
}

/// Error response that also drops the cookie when the session is gone
pub(crate) fn rejection(config: &AuthConfig, err: AuthError) -> Response {
    let clears_session = matches!(err, AuthError::SessionInvalid | AuthError::Banned);
    let mut response = err.into_response();

    if clears_session {
        if let Ok(value) = HeaderValue::from_str(&config.cookie().build_delete_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
