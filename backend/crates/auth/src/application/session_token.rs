//! Session Token Signing
//!
//! The cookie carries `{session_id}.{base64url(hmac_sha256(secret, session_id))}`.
//! The signature only proves the id was issued by this server; the session
//! row decides whether it is still valid.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &[u8; 32], session_id: &str) -> AuthResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("Invalid session secret: {e}")))?;
    mac.update(session_id.as_bytes());
    Ok(mac)
}

/// Generate signed session token
pub fn sign(secret: &[u8; 32], session_id: Uuid) -> AuthResult<String> {
    let session_id = session_id.to_string();
    let signature = mac_for(secret, &session_id)?.finalize().into_bytes();

    Ok(format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature)))
}

/// Parse and verify session token
pub fn verify(secret: &[u8; 32], token: &str) -> AuthResult<Uuid> {
    let (session_id, signature_b64) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::SessionInvalid)?;

    mac_for(secret, session_id)?
        .verify_slice(&signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    session_id.parse().map_err(|_| AuthError::SessionInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_signed_token_verifies() {
        let id = Uuid::new_v4();
        let token = sign(&SECRET, id).unwrap();
        assert!(token.starts_with(&id.to_string()));
        assert_eq!(verify(&SECRET, &token).unwrap(), id);
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = sign(&SECRET, Uuid::new_v4()).unwrap();
        assert!(matches!(
            verify(&[8u8; 32], &token),
            Err(AuthError::SessionInvalid)
        ));
    }

    #[test]
    fn test_swapped_id_rejected() {
        let token = sign(&SECRET, Uuid::new_v4()).unwrap();
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), signature);
        assert!(verify(&SECRET, &forged).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verify(&SECRET, "").is_err());
        assert!(verify(&SECRET, "no-dot").is_err());
        assert!(verify(&SECRET, "a.b.c").is_err());
        assert!(verify(&SECRET, "not-a-uuid.!!!").is_err());
    }
}
