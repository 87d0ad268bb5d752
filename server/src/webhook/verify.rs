//! HMAC-SHA256 Webhook Verification
//!
//! Authenticates webhook payloads before anything downstream trusts them.
//! The signature is computed over the exact request body bytes, never a
//! re-serialized form, and compared in constant time.

use axum::http::StatusCode;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Why a webhook was rejected. Each variant maps to a distinct status code
/// so the sender can tell an auth failure from a malformed delivery.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("received request without body")]
    EmptyBody,

    #[error("failed to decode json: {0}")]
    MalformedPayload(serde_json::Error),

    #[error("no expiration date sent")]
    MissingExpiry,

    #[error("missing signature header")]
    MissingSignature,

    #[error("invalid HMAC signature")]
    InvalidSignature,

    #[error("webhook message expired")]
    Expired,

    #[error("webhook secret is not configured")]
    SecretNotConfigured,
}

impl VerifyError {
    /// Status class for the rejection: signature problems are 401,
    /// everything else (including an unconfigured secret) is 400.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingSignature | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Sign a payload with HMAC-SHA256 and return the hex-encoded signature.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify an HMAC-SHA256 signature against the raw payload bytes.
///
/// The comparison goes through `Mac::verify_slice`, which is constant-time,
/// so rejection latency does not leak where the signatures diverge.
fn verify_signature(secret: &str, payload: &[u8], signature_hex: &str) -> Result<(), VerifyError> {
    let signature = hex::decode(signature_hex).map_err(|_| VerifyError::InvalidSignature)?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.verify_slice(&signature)
        .map_err(|_| VerifyError::InvalidSignature)
}

/// Verify an inbound webhook and return the parsed event.
///
/// Checks run in a fixed order: empty body, JSON parse, expiry presence,
/// signature, expiry value. Parsing has to succeed before `expires_at` can
/// be read, but the signature is still checked against the raw bytes, and
/// before the expiry value is judged.
pub fn verify(
    raw: &[u8],
    signature_hex: &str,
    secret: &str,
) -> Result<serde_json::Value, VerifyError> {
    if raw.is_empty() {
        return Err(VerifyError::EmptyBody);
    }

    let event: serde_json::Value =
        serde_json::from_slice(raw).map_err(VerifyError::MalformedPayload)?;

    let expires_at = event
        .get("expires_at")
        .and_then(serde_json::Value::as_f64)
        .ok_or(VerifyError::MissingExpiry)?;

    verify_signature(secret, raw, signature_hex)?;

    let now = chrono::Utc::now().timestamp() as f64;
    if now > expires_at {
        return Err(VerifyError::Expired);
    }

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test_secret_12345";

    fn future_event(session_id: &str) -> Vec<u8> {
        let expires = chrono::Utc::now().timestamp() + 60;
        serde_json::to_vec(&json!({
            "expires_at": expires,
            "payload": { "session_id": session_id }
        }))
        .unwrap()
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let body = future_event("abc");
        let sig = sign_payload(SECRET, &body);

        let event = verify(&body, &sig, SECRET).unwrap();
        assert_eq!(event["payload"]["session_id"], "abc");
    }

    #[test]
    fn rejects_mutated_body() {
        // Signature computed over one body, presented with another that is
        // still well-formed JSON with an expiry.
        let body = future_event("abc");
        let sig = sign_payload(SECRET, &body);
        let mutated = future_event("abd");

        assert!(matches!(
            verify(&mutated, &sig, SECRET),
            Err(VerifyError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_wrong_secret() {
        let body = future_event("abc");
        let sig = sign_payload("wrong_secret", &body);

        assert!(matches!(
            verify(&body, &sig, SECRET),
            Err(VerifyError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_non_hex_signature() {
        let body = future_event("abc");

        assert!(matches!(
            verify(&body, "not hex at all", SECRET),
            Err(VerifyError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_expired_event_with_valid_signature() {
        let expires = chrono::Utc::now().timestamp() - 10;
        let body = serde_json::to_vec(&json!({
            "expires_at": expires,
            "payload": { "session_id": "abc" }
        }))
        .unwrap();
        let sig = sign_payload(SECRET, &body);

        assert!(matches!(
            verify(&body, &sig, SECRET),
            Err(VerifyError::Expired)
        ));
    }

    #[test]
    fn empty_body_rejected_before_signature() {
        // Even a garbage signature reports EmptyBody first.
        assert!(matches!(
            verify(b"", "zz", SECRET),
            Err(VerifyError::EmptyBody)
        ));
    }

    #[test]
    fn malformed_json_rejected_before_signature() {
        let body = b"{ not json";
        let sig = sign_payload(SECRET, body);

        assert!(matches!(
            verify(body, &sig, SECRET),
            Err(VerifyError::MalformedPayload(_))
        ));
    }

    #[test]
    fn missing_expiry_rejected_before_signature() {
        // Correctly signed but without expires_at: the presence check wins.
        let body = serde_json::to_vec(&json!({ "payload": { "session_id": "abc" } })).unwrap();

        assert!(matches!(
            verify(&body, "deadbeef", SECRET),
            Err(VerifyError::MissingExpiry)
        ));
    }

    #[test]
    fn bad_signature_rejected_before_expiry_value() {
        // Expired AND badly signed: the signature check runs first.
        let expires = chrono::Utc::now().timestamp() - 10;
        let body = serde_json::to_vec(&json!({ "expires_at": expires })).unwrap();

        assert!(matches!(
            verify(&body, "deadbeef", SECRET),
            Err(VerifyError::InvalidSignature)
        ));
    }

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(VerifyError::EmptyBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(VerifyError::MissingExpiry.status(), StatusCode::BAD_REQUEST);
        assert_eq!(VerifyError::Expired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            VerifyError::SecretNotConfigured.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VerifyError::InvalidSignature.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            VerifyError::MissingSignature.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
