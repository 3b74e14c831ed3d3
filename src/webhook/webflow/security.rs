//! Signature verification for incoming Webflow webhook requests.
//!
//! Webflow signs webhook payloads with HMAC-SHA256 using the site's webhook
//! secret and sends the hex signature in the `x-webflow-signature` header
//! (some forwarders prefix it with `sha256=`). The signature is computed
//! over the raw request body bytes, so verification must happen before JSON
//! parsing, and the comparison must be constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the signature header against the raw request body.
///
/// Returns `false` for malformed headers as well as mismatches; callers
/// treat both as an unauthorized request.
pub fn verify_signature(signature_header: &str, payload: &[u8], secret: &str) -> bool {
    let signature_hex = signature_header
        .strip_prefix("sha256=")
        .unwrap_or(signature_header);

    let expected_signature = match hex::decode(signature_hex) {
        Ok(sig) => sig,
        Err(e) => {
            log::warn!("Failed to decode webhook signature hex: {}", e);
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            log::error!("Failed to create HMAC instance: {}", e);
            return false;
        }
    };

    mac.update(payload);
    let computed_signature = mac.finalize().into_bytes();

    let is_valid: bool = computed_signature.ct_eq(&expected_signature[..]).into();

    if !is_valid {
        log::warn!("Webhook signature verification failed: signatures do not match");
    }

    is_valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_signature_valid() {
        let payload = b"{\"data\":{\"email\":\"a@x.com\"}}";
        let secret = "test_secret";

        assert!(verify_signature(&sign(payload, secret), payload, secret));
    }

    #[test]
    fn test_verify_signature_accepts_sha256_prefix() {
        let payload = b"{\"data\":{\"email\":\"a@x.com\"}}";
        let secret = "test_secret";
        let header = format!("sha256={}", sign(payload, secret));

        assert!(verify_signature(&header, payload, secret));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let payload = b"{\"data\":{\"email\":\"a@x.com\"}}";

        assert!(!verify_signature(
            &sign(payload, "other_secret"),
            payload,
            "test_secret"
        ));
    }

    #[test]
    fn test_verify_signature_tampered_payload() {
        let payload = b"{\"data\":{\"email\":\"a@x.com\"}}";
        let tampered = b"{\"data\":{\"email\":\"b@x.com\"}}";
        let secret = "test_secret";

        assert!(!verify_signature(&sign(payload, secret), tampered, secret));
    }

    #[test]
    fn test_verify_signature_invalid_hex() {
        assert!(!verify_signature("zzzzz", b"{}", "test_secret"));
    }
}
