//! HMAC-SHA256 signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::encoding::{RawPayload, SignatureBlob};
use crate::error::{FailureReason, HooksealError, Result, VerificationResult};
use crate::keys::{MacAlgorithm, SymmetricKeyMaterial};

type HmacSha256 = Hmac<Sha256>;

/// Verifier for HMAC webhook signatures.
pub struct SymmetricVerifier<'a> {
    key: &'a SymmetricKeyMaterial,
}

impl<'a> SymmetricVerifier<'a> {
    /// Creates a new verifier with the shared secret.
    pub fn new(key: &'a SymmetricKeyMaterial) -> Self {
        Self { key }
    }

    /// Verifies a base64 HMAC against the payload bytes.
    ///
    /// # Arguments
    /// * `payload` - The raw request body
    /// * `expected` - The base64 MAC sent with the webhook
    pub fn verify<'p>(&self, payload: impl Into<RawPayload<'p>>, expected: &str) -> VerificationResult {
        let expected = match SignatureBlob::from_base64(expected) {
            Ok(blob) => blob,
            Err(reason) => return reason.into(),
        };

        let computed = match self.compute(payload.into()) {
            Some(mac) => mac,
            None => return FailureReason::SignatureComputation.into(),
        };

        if constant_time_eq(&computed, expected.as_bytes()) {
            VerificationResult::valid()
        } else {
            FailureReason::SignatureMismatch.into()
        }
    }

    /// Computes the base64 MAC a producer would send for this payload.
    pub fn sign<'p>(&self, payload: impl Into<RawPayload<'p>>) -> Result<String> {
        self.compute(payload.into())
            .map(|mac| STANDARD.encode(mac))
            .ok_or_else(|| HooksealError::InvalidKey(format!("{} rejected the key", self.key.algorithm())))
    }

    fn compute(&self, payload: RawPayload<'_>) -> Option<Vec<u8>> {
        match self.key.algorithm() {
            MacAlgorithm::HmacSha256 => {
                let mut mac = <HmacSha256 as Mac>::new_from_slice(self.key.secret()).ok()?;
                mac.update(payload.as_bytes());
                Some(mac.finalize().into_bytes().to_vec())
            }
        }
    }
}

/// Constant-time equality comparison.
///
/// Lengths are public (fixed by the algorithm); contents are compared without
/// early exit.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = include_str!("../../tests/fixtures/webhook.json");
    const SECRET: &[u8] = b"this is example of the HMAC key";
    const SIGNATURE: &str = "i1PzFQMpGoM3YwjcDUEtBwNMCa01kjCykHLLoA5oZtE=";

    fn key() -> SymmetricKeyMaterial {
        SymmetricKeyMaterial::new(SECRET, MacAlgorithm::HmacSha256).unwrap()
    }

    #[test]
    fn test_hmac_verifier() {
        let key = key();
        let verifier = SymmetricVerifier::new(&key);

        assert!(verifier.verify(BODY, SIGNATURE).is_valid());
        assert_eq!(
            verifier.verify("test payload", SIGNATURE).failure(),
            Some(FailureReason::SignatureMismatch)
        );
    }

    #[test]
    fn test_hmac_sign_matches_vector() {
        let key = key();
        assert_eq!(SymmetricVerifier::new(&key).sign(BODY).unwrap(), SIGNATURE);
    }

    #[test]
    fn test_hmac_verifier_wrong_secret() {
        let key = SymmetricKeyMaterial::new(b"wrong-secret", MacAlgorithm::HmacSha256).unwrap();
        let result = SymmetricVerifier::new(&key).verify(BODY, SIGNATURE);
        assert_eq!(result.failure(), Some(FailureReason::SignatureMismatch));
    }

    #[test]
    fn test_hmac_verifier_malformed_signature() {
        let key = key();
        let verifier = SymmetricVerifier::new(&key);
        assert_eq!(
            verifier.verify(BODY, "sha256=invalid").failure(),
            Some(FailureReason::MalformedSignature)
        );
    }

    #[test]
    fn test_hmac_verifier_truncated_signature() {
        let key = key();
        let verifier = SymmetricVerifier::new(&key);
        // Well-formed base64 of the first 30 MAC bytes.
        let full = SignatureBlob::from_base64(SIGNATURE).unwrap();
        let truncated = STANDARD.encode(&full.as_bytes()[..30]);
        assert_eq!(
            verifier.verify(BODY, &truncated).failure(),
            Some(FailureReason::SignatureMismatch)
        );
    }

    #[test]
    fn test_hmac_verifier_changed_character() {
        let key = key();
        let verifier = SymmetricVerifier::new(&key);
        let altered = SIGNATURE.replacen('i', "j", 1);
        assert!(!verifier.verify(BODY, &altered).is_valid());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
