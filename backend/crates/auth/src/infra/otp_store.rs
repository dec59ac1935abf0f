//! In-Process OTP Store
//!
//! Pending codes live in a mutex-guarded map inside this process. They do
//! not survive a restart and are not shared between instances, so password
//! reset only works when every request reaches the same process. Running
//! more than one instance needs an `OtpRepository` backed by shared storage.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::entity::otp::OtpCode;
use crate::domain::repository::OtpRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
pub struct InMemoryOtpStore {
    codes: Mutex<HashMap<String, OtpCode>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every code that expired before `now_ms`
    pub async fn purge_expired(&self, now_ms: i64) -> usize {
        let mut codes = self.codes.lock().await;
        let before = codes.len();
        codes.retain(|_, otp| !otp.is_expired_at(now_ms));
        before - codes.len()
    }

    #[cfg(test)]
    pub(crate) async fn pending(&self, email: &Email) -> Option<OtpCode> {
        self.codes.lock().await.get(email.as_str()).cloned()
    }
}

impl OtpRepository for InMemoryOtpStore {
    async fn put_otp(&self, email: &Email, otp: OtpCode) -> AuthResult<()> {
        self.codes.lock().await.insert(email.to_string(), otp);
        Ok(())
    }

    async fn consume_otp(&self, email: &Email, code: &str, now_ms: i64) -> AuthResult<()> {
        let mut codes = self.codes.lock().await;
        let (expired, matches) = match codes.get(email.as_str()) {
            Some(otp) => (otp.is_expired_at(now_ms), otp.matches(code)),
            None => return Err(AuthError::OtpNotFound),
        };

        if expired {
            codes.remove(email.as_str());
            return Err(AuthError::OtpExpired);
        }
        if !matches {
            return Err(AuthError::InvalidOtp);
        }

        codes.remove(email.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn email(s: &str) -> Email {
        Email::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_put_overwrites_pending_code() {
        let store = InMemoryOtpStore::new();
        let a = email("a@x.com");
        store.put_otp(&a, OtpCode::new("111111", 10)).await.unwrap();
        store.put_otp(&a, OtpCode::new("222222", 20)).await.unwrap();

        assert!(matches!(
            store.consume_otp(&a, "111111", 0).await,
            Err(AuthError::InvalidOtp)
        ));
        store.consume_otp(&a, "222222", 0).await.unwrap();
    }

    #[tokio::test]
    async fn test_codes_are_per_email() {
        let store = InMemoryOtpStore::new();
        store.put_otp(&email("a@x.com"), OtpCode::new("111111", 10)).await.unwrap();

        assert!(matches!(
            store.consume_otp(&email("b@x.com"), "111111", 0).await,
            Err(AuthError::OtpNotFound)
        ));
        assert!(store.pending(&email("a@x.com")).await.is_some());
    }

    #[tokio::test]
    async fn test_consume_removes_code() {
        let store = InMemoryOtpStore::new();
        let a = email("a@x.com");
        store.put_otp(&a, OtpCode::new("111111", 10)).await.unwrap();

        store.consume_otp(&a, "111111", 5).await.unwrap();
        assert!(store.pending(&a).await.is_none());
        assert!(matches!(
            store.consume_otp(&a, "111111", 5).await,
            Err(AuthError::OtpNotFound)
        ));
    }

    #[tokio::test]
    async fn test_wrong_code_is_kept_and_expired_code_dropped() {
        let store = InMemoryOtpStore::new();
        let a = email("a@x.com");
        store.put_otp(&a, OtpCode::new("111111", 10)).await.unwrap();

        assert!(matches!(
            store.consume_otp(&a, "999999", 5).await,
            Err(AuthError::InvalidOtp)
        ));
        assert!(store.pending(&a).await.is_some());

        assert!(matches!(
            store.consume_otp(&a, "111111", 11).await,
            Err(AuthError::OtpExpired)
        ));
        assert!(store.pending(&a).await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consume_accepts_code_once() {
        let store = Arc::new(InMemoryOtpStore::new());
        let a = email("a@x.com");
        store.put_otp(&a, OtpCode::new("111111", i64::MAX)).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let a = a.clone();
                tokio::spawn(async move { store.consume_otp(&a, "111111", 0).await.is_ok() })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = InMemoryOtpStore::new();
        store.put_otp(&email("a@x.com"), OtpCode::new("111111", 10)).await.unwrap();
        store.put_otp(&email("b@x.com"), OtpCode::new("222222", 100)).await.unwrap();

        assert_eq!(store.purge_expired(50).await, 1);
        assert!(store.pending(&email("b@x.com")).await.is_some());
    }
}
