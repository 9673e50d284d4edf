//! Callback signature handling
//!
//! The platform signs every callback body with HMAC-SHA256 keyed by the bot's
//! auth token and sends the lowercase hex digest in
//! `X-Viber-Content-Signature`.

use crate::{Result, WebhookError};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex signature of the raw body
pub const SIGNATURE_HEADER: &str = "X-Viber-Content-Signature";

/// Sign a payload with HMAC-SHA256 and return the lowercase hex digest.
pub fn sign_payload(payload: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can accept any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Check `signature` against the HMAC of `payload`.
///
/// Empty bodies and empty signatures never verify. The hex strings are
/// compared in constant time and case-sensitively.
pub fn verify_signature(payload: &[u8], signature: &str, secret: &[u8]) -> bool {
    if payload.is_empty() || signature.is_empty() {
        return false;
    }

    let expected = sign_payload(payload, secret);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// Verifier bound to one shared secret
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
}

impl WebhookVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Verify a callback signature
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<()> {
        if verify_signature(payload, signature, &self.secret) {
            Ok(())
        } else {
            Err(WebhookError::SignatureVerificationFailed(
                "signature does not match payload".to_string(),
            ))
        }
    }

    /// Sign a payload the way the platform would
    pub fn sign(&self, payload: &[u8]) -> String {
        sign_payload(payload, &self.secret)
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
