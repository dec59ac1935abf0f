pub mod auth_session;
pub mod banned_email;
pub mod otp;
pub mod user;
