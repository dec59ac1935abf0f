//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    auth_session::AuthSession, banned_email::BannedEmail, otp::OtpCode, user::User,
};
pub use repository::{
    AuthSessionRepository, BannedEmailRepository, OtpRepository, ProfileGateway, UserRepository,
};
