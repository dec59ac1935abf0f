//! Request OTP Use Case
//!
//! Issues a password-reset code and mails it. Delivery is best-effort: a
//! mail failure is logged and the code stays valid.

use std::sync::Arc;

use chrono::Utc;
use platform::mail::{MailMessage, Mailer};

use crate::application::config::AuthConfig;
use crate::domain::entity::otp::OtpCode;
use crate::domain::repository::{OtpRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub const OTP_MAIL_SUBJECT: &str = "Your password reset code";

pub struct RequestOtpUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    user_repo: Arc<U>,
    otp_repo: Arc<O>,
    mailer: Arc<Mailer>,
    config: Arc<AuthConfig>,
}

impl<U, O> RequestOtpUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        otp_repo: Arc<O>,
        mailer: Arc<Mailer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            otp_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email)?;

        if self.user_repo.find_user_by_email(&email).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        let otp = OtpCode::generate(
            self.config.otp_length,
            Utc::now().timestamp_millis(),
            self.config.otp_ttl_ms(),
        );
        let message = otp_message(&email, &otp, self.config.otp_ttl_minutes());

        // Replaces any code still pending for this email
        self.otp_repo.put_otp(&email, otp).await?;

        match self.mailer.send(&message).await {
            Ok(()) => tracing::info!(email = %email, "Password reset code sent"),
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Password reset mail not delivered")
            }
        }

        Ok(())
    }
}

fn otp_message(email: &Email, otp: &OtpCode, ttl_minutes: u64) -> MailMessage {
    MailMessage {
        to: email.to_string(),
        subject: OTP_MAIL_SUBJECT.to_string(),
        text: format!(
            "Your password reset code is {}.\n\nIt expires in {} minutes. \
             If you did not ask to reset your password, ignore this message.",
            otp.expose(),
            ttl_minutes
        ),
    }
}

/// Pull the code back out of a message built by this module
#[cfg(test)]
pub(crate) fn code_from_message(text: &str) -> Option<&str> {
    text.strip_prefix("Your password reset code is ")?
        .split('.')
        .next()
}
