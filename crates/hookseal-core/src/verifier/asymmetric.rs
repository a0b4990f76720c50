//! RSA/SHA-256 (PKCS#1 v1.5) signature verification.

use rsa::pkcs1v15::Signature;
use rsa::signature::Verifier;
use rsa::traits::PublicKeyParts;

use crate::encoding::{RawPayload, SignatureBlob};
use crate::error::{FailureReason, VerificationResult};
use crate::keys::AsymmetricKeyMaterial;

/// Verifier for RSA webhook signatures.
pub struct AsymmetricVerifier<'a> {
    key: &'a AsymmetricKeyMaterial,
}

impl<'a> AsymmetricVerifier<'a> {
    /// Creates a new verifier for the given public key.
    pub fn new(key: &'a AsymmetricKeyMaterial) -> Self {
        Self { key }
    }

    /// Verifies a base64 signature over the payload bytes.
    ///
    /// # Arguments
    /// * `payload` - The raw request body
    /// * `signature` - The base64 signature sent with the webhook
    pub fn verify<'p>(&self, payload: impl Into<RawPayload<'p>>, signature: &str) -> VerificationResult {
        let payload = payload.into();

        let blob = match SignatureBlob::from_base64(signature) {
            Ok(blob) => blob,
            Err(reason) => return reason.into(),
        };

        // PKCS#1 v1.5 signatures are exactly as long as the modulus.
        if blob.len() != self.key.public_key().size() {
            return FailureReason::MalformedSignature.into();
        }

        let signature = match Signature::try_from(blob.as_bytes()) {
            Ok(signature) => signature,
            Err(_) => return FailureReason::MalformedSignature.into(),
        };

        match self.key.verifying_key().verify(payload.as_bytes(), &signature) {
            Ok(()) => VerificationResult::valid(),
            Err(_) => FailureReason::SignatureMismatch.into(),
        }
    }
}
