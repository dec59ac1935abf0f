//! Application Layer
//!
//! Use cases and application services.

pub mod admin_login;
pub mod authorize;
pub mod config;
pub mod current_user;
pub mod login;
pub mod logout;
pub mod register;
pub mod request_otp;
pub mod reset_password;
pub mod session_token;

// Re-exports
pub use admin_login::AdminLoginUseCase;
pub use authorize::AuthorizeSessionUseCase;
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use request_otp::RequestOtpUseCase;
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
