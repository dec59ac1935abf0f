//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors go through
//! each crate's error type and `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::domain::repository::AuthSessionRepository;
use auth::{AuthConfig, InMemoryOtpStore, PgAuthRepository, SessionGuard, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use catalog::{CatalogConfig, CatalogProfiles, PgCatalogRepository, catalog_router};
use moderation::moderation_router;
use platform::mail::Mailer;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const OTP_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "api=info,auth=info,catalog=info,moderation=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_repo = PgAuthRepository::new(pool.clone());
    let catalog_repo = PgCatalogRepository::new(pool.clone());

    // Startup cleanup; errors here should not prevent server startup
    if let Err(e) = auth_repo.cleanup_expired().await {
        tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
    }

    let auth_config = Arc::new(load_auth_config()?);
    let catalog_config = Arc::new(load_catalog_config());

    let mail_from = env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@lms.local".to_string());
    let mailer = match env::var("MAIL_RELAY_URL") {
        Ok(url) => Mailer::relay(url, mail_from),
        Err(_) => {
            tracing::warn!("MAIL_RELAY_URL not set, password reset mails are only logged");
            Mailer::log_only(mail_from)
        }
    };

    // Process-local OTP store; pending codes do not survive restarts
    let otp_store = Arc::new(InMemoryOtpStore::new());
    spawn_otp_purge(otp_store.clone());

    let profiles = CatalogProfiles::new(Arc::new(catalog_repo.clone()), catalog_config.clone());
    let guard = SessionGuard::new(Arc::new(auth_repo.clone()), auth_config.clone());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let api = auth_router(
        auth_repo.clone(),
        profiles,
        otp_store,
        mailer,
        auth_config,
    )
    .merge(catalog_router(
        catalog_repo.clone(),
        guard.clone(),
        catalog_config.clone(),
    ))
    .merge(moderation_router(auth_repo, catalog_repo, guard));

    // Build router
    let app = Router::new()
        .nest("/api", api)
        .nest_service(
            &catalog_config.public_prefix,
            ServeDir::new(&catalog_config.upload_dir),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = match env::var("PORT") {
        Ok(port) => port.parse().context("PORT must be a port number")?,
        Err(_) => 5001,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("SESSION_SECRET").context("SESSION_SECRET must be set in production")?;
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, secret_b64.trim())?;
        anyhow::ensure!(
            secret_bytes.len() == 32,
            "SESSION_SECRET must decode to 32 bytes"
        );
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AuthConfig {
            session_secret: secret,
            ..AuthConfig::default()
        }
    };

    if let Ok(secure) = env::var("COOKIE_SECURE") {
        config.cookie_secure = secure.trim().eq_ignore_ascii_case("true");
    }

    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }

    match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            config = config.with_admin(email, password);
        }
        _ => tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, admin login disabled"),
    }

    Ok(config)
}

fn load_catalog_config() -> CatalogConfig {
    let config = CatalogConfig::default();
    match env::var("UPLOAD_DIR") {
        Ok(dir) => config.with_upload_dir(dir),
        Err(_) => config,
    }
}

/// Drop expired reset codes so the map does not grow with abandoned requests
fn spawn_otp_purge(store: Arc<InMemoryOtpStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(OTP_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired(chrono::Utc::now().timestamp_millis()).await;
            if purged > 0 {
                tracing::debug!(purged, "Expired OTP codes purged");
            }
        }
    });
}
