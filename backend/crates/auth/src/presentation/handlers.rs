//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::response::ApiResponse;
use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::application::{
    AdminLoginUseCase, CurrentUserUseCase, LoginInput, LoginOutput, LoginUseCase, LogoutUseCase,
    RegisterInput, RegisterUseCase, RequestOtpUseCase, ResetPasswordInput, ResetPasswordUseCase,
};
use crate::domain::repository::{AuthStore, ProfileGateway};
use crate::error::AuthResult;
use crate::infra::otp_store::InMemoryOtpStore;
use crate::presentation::dto::{
    CredentialsRequest, RequestOtpRequest, SessionUserResponse, VerifyOtpRequest,
};
use crate::presentation::middleware::rejection;

/// Shared state for auth handlers
pub struct AuthAppState<R, P> {
    pub repo: Arc<R>,
    pub profiles: Arc<P>,
    pub otp: Arc<InMemoryOtpStore>,
    pub mailer: Arc<Mailer>,
    pub config: Arc<AuthConfig>,
}

impl<R, P> Clone for AuthAppState<R, P> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            profiles: self.profiles.clone(),
            otp: self.otp.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/register
pub async fn register<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: ProfileGateway + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.profiles.clone(),
        state.config.clone(),
    );

    use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::message("User registered successfully"),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/login
pub async fn login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<Response>
where
    R: AuthStore,
    P: ProfileGateway + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.profiles.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(session_established(&state.config, output, "Login successful"))
}

/// POST /api/admin/login
pub async fn admin_login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<Response>
where
    R: AuthStore,
    P: ProfileGateway + Send + Sync + 'static,
{
    let use_case = AdminLoginUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(&req.email, &req.password).await?;

    Ok(session_established(&state.config, output, "Admin login successful"))
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/current-user
pub async fn current_user<R, P>(
    State(state): State<AuthAppState<R, P>>,
    headers: HeaderMap,
) -> Result<ApiResponse<SessionUserResponse>, Response>
where
    R: AuthStore,
    P: ProfileGateway + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = CurrentUserUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.profiles.clone(),
        state.config.clone(),
    );

    let session = use_case
        .execute(token.as_deref())
        .await
        .map_err(|e| rejection(&state.config, e))?;

    Ok(ApiResponse::with_data(
        "Current user",
        SessionUserResponse::from(&session),
    ))
}

/// POST /api/logout
pub async fn logout<R, P>(
    State(state): State<AuthAppState<R, P>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: ProfileGateway + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    LogoutUseCase::new(state.repo.clone(), state.config.clone())
        .execute(token.as_deref())
        .await?;

    Ok((
        [(header::SET_COOKIE, state.config.cookie().build_delete_cookie())],
        ApiResponse::message("Logged out successfully"),
    ))
}

// ============================================================================
// Password reset
// ============================================================================

/// POST /api/request-otp
pub async fn request_otp<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<RequestOtpRequest>,
) -> AuthResult<ApiResponse<()>>
where
    R: AuthStore,
    P: ProfileGateway + Send + Sync + 'static,
{
    RequestOtpUseCase::new(
        state.repo.clone(),
        state.otp.clone(),
        state.mailer.clone(),
        state.config.clone(),
    )
    .execute(&req.email)
    .await?;

    Ok(ApiResponse::message("OTP sent to email"))
}

/// POST /api/verify-otp
pub async fn verify_otp<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<VerifyOtpRequest>,
) -> AuthResult<ApiResponse<()>>
where
    R: AuthStore,
    P: ProfileGateway + Send + Sync + 'static,
{
    ResetPasswordUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.otp.clone(),
        state.config.clone(),
    )
    .execute(ResetPasswordInput {
        email: req.email,
        otp: req.otp,
        new_password: req.new_password,
    })
    .await?;

    Ok(ApiResponse::message("Password updated successfully"))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_established(
    config: &AuthConfig,
    output: LoginOutput,
    message: &'static str,
) -> Response {
    let cookie = config.cookie().build_set_cookie(&output.session_token);

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        ApiResponse::with_data(message, SessionUserResponse::from(&output.session)),
    )
        .into_response()
}
