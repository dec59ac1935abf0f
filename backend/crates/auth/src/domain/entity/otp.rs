//! One-Time Password Entity
//!
//! Pending password-reset code for a single email.

use std::fmt;

use platform::crypto::constant_time_eq;

#[derive(Clone)]
pub struct OtpCode {
    code: String,
    /// Absolute expiry (Unix timestamp ms)
    pub expires_at_ms: i64,
}

impl OtpCode {
    pub fn new(code: impl Into<String>, expires_at_ms: i64) -> Self {
        Self {
            code: code.into(),
            expires_at_ms,
        }
    }

    /// Issue a fresh random numeric code
    pub fn generate(len: usize, now_ms: i64, ttl_ms: i64) -> Self {
        Self::new(platform::crypto::random_digits(len), now_ms + ttl_ms)
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }

    /// Exact comparison in constant time
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), candidate.trim().as_bytes())
    }

    /// The code itself, for the outgoing mail only
    pub fn expose(&self) -> &str {
        &self.code
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpCode")
            .field("code", &"[REDACTED]")
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}
