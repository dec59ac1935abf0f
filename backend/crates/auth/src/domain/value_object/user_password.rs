//! User Password Value Objects
//!
//! `RawPassword` is what the client typed, validated and zeroized on drop.
//! `UserPassword` is the Argon2id PHC string that gets stored. Both delegate
//! the cryptography to `platform::password`.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Trim, NFKC-normalize, and check the length and character rules
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, .. } => {
                AppError::bad_request(format!("Password must be at least {min} characters"))
                    .with_action("Please choose a longer password")
            }
            PasswordPolicyError::TooLong { max, .. } => {
                AppError::bad_request(format!("Password must be at most {max} characters"))
                    .with_action("Please choose a shorter password")
            }
            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password is required")
            }
            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
                    .with_action("Please remove any control characters")
            }
        })?;

        Ok(Self(clear_text))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed password for storage
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a validated raw password
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        raw.0.hash(pepper).map(Self).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                AppError::internal(format!("Password hashing failed: {msg}"))
            }
            PasswordHashError::InvalidHashFormat => {
                AppError::internal("Unexpected error during password hashing")
            }
        })
    }

    /// Rehydrate from the stored PHC string
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| AppError::internal("Invalid password hash in database"))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time verification
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

    #[test]
    fn test_length_rules() {
        assert!(RawPassword::new("secret1".to_string()).is_ok());
        assert!(RawPassword::new("a".repeat(MIN_PASSWORD_LENGTH)).is_ok());
        assert!(RawPassword::new("a".repeat(MIN_PASSWORD_LENGTH - 1)).is_err());
        assert!(RawPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
        assert!(RawPassword::new("      ".to_string()).is_err());
    }

    #[test]
    fn test_short_password_message() {
        let err = RawPassword::new("abc".to_string()).unwrap_err();
        assert_eq!(err.message(), "Password must be at least 6 characters");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let stored = RawPassword::new("secret1".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&stored, None).unwrap();

        let typed = RawPassword::new("  secret1\t".to_string()).unwrap();
        assert!(hashed.verify(&typed, None));
    }

    #[test]
    fn test_verify_rejects_other_password() {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();

        let wrong = RawPassword::new("secret2".to_string()).unwrap();
        assert!(!hashed.verify(&wrong, Some(b"pepper")));
        assert!(!hashed.verify(&raw, None));
    }

    #[test]
    fn test_stored_hash_reloads() {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        let reloaded = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(reloaded.verify(&raw, None));
        assert!(UserPassword::from_phc_string("not-a-hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        assert!(!format!("{raw:?}").contains("secret1"));

        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(!format!("{hashed:?}").contains("argon2"));
    }
}
