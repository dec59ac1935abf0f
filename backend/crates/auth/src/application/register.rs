//! Register Use Case
//!
//! Creates a user account and its default profile.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{BannedEmailRepository, ProfileGateway, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<U, B, P>
where
    U: UserRepository,
    B: BannedEmailRepository,
    P: ProfileGateway,
{
    user_repo: Arc<U>,
    ban_repo: Arc<B>,
    profiles: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<U, B, P> RegisterUseCase<U, B, P>
where
    U: UserRepository,
    B: BannedEmailRepository,
    P: ProfileGateway,
{
    pub fn new(
        user_repo: Arc<U>,
        ban_repo: Arc<B>,
        profiles: Arc<P>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            ban_repo,
            profiles,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let email = Email::new(&input.email)?;
        let raw_password = RawPassword::new(input.password)?;

        if self.ban_repo.is_banned(&email).await? {
            return Err(AuthError::Banned);
        }

        if self.user_repo.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new(email, password_hash);

        self.user_repo.insert_user(&user).await?;

        // Registration is all-or-nothing: undo the user if the profile fails
        if let Err(e) = self.profiles.load_or_create_profile(&user.email).await {
            if let Err(rollback) = self.user_repo.delete_user(&user.user_id).await {
                tracing::error!(
                    email = %user.email,
                    error = %rollback,
                    "Failed to roll back user after profile error"
                );
            }
            return Err(e);
        }

        tracing::info!(user_id = %user.user_id, email = %user.email, "User registered");

        Ok(user)
    }
}
