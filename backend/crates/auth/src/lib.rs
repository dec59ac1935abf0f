//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router, session middleware
//!
//! ## Features
//! - Email + password registration and login
//! - Single configured admin account
//! - Password reset through emailed one-time codes
//! - Server-side sessions referenced by a signed cookie
//! - Bans enforced on every session-bearing request
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Session cookies carry `{session_id}.{hmac}`; the row lives in the database
//! - A banned email loses its session on the next request it makes

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AdminCredentials, AuthConfig};
pub use domain::entity::auth_session::AuthSession;
pub use domain::repository::{AuthStore, ProfileGateway, ProfileSnapshot};
pub use domain::value_object::email::Email;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryAuthRepository;
pub use infra::otp_store::InMemoryOtpStore;
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{CurrentSession, SessionGuard, require_admin, require_session};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
