//! Scheme dispatch for webhook authentication.
//!
//! The scheme is agreed with the producer per integration. It must come from
//! configuration, never from the request being verified.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoding::{RawPayload, canonical_bytes};
use crate::error::{FailureReason, HooksealError, Result, VerificationResult};
use crate::keys::KeyMaterial;
use crate::verifier::{AsymmetricVerifier, SymmetricVerifier};

/// Signature scheme used by an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// RSA signature over SHA-256, verified with a public key.
    Asymmetric,
    /// HMAC-SHA256 keyed by a shared secret.
    Symmetric,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Asymmetric => "asymmetric",
            Scheme::Symmetric => "symmetric",
        }
    }
}

impl FromStr for Scheme {
    type Err = HooksealError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asymmetric" | "rsa" | "digital-signature" => Ok(Scheme::Asymmetric),
            "symmetric" | "hmac" => Ok(Scheme::Symmetric),
            _ => Err(HooksealError::UnsupportedScheme(s.to_string())),
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verifies `signature` over `payload` with the verifier selected by `scheme`.
///
/// Stateless and side-effect free. A key that does not belong to `scheme` is
/// rejected with [`FailureReason::UnsupportedScheme`].
pub fn authenticate(scheme: Scheme, payload: &str, signature: &str, key: &KeyMaterial) -> VerificationResult {
    dispatch(scheme, canonical_bytes(payload).into(), signature, key)
}

fn dispatch(scheme: Scheme, payload: RawPayload<'_>, signature: &str, key: &KeyMaterial) -> VerificationResult {
    let result = match (scheme, key) {
        (Scheme::Asymmetric, KeyMaterial::Asymmetric(key)) => AsymmetricVerifier::new(key).verify(payload, signature),
        (Scheme::Symmetric, KeyMaterial::Symmetric(key)) => SymmetricVerifier::new(key).verify(payload, signature),
        _ => FailureReason::UnsupportedScheme.into(),
    };

    match result.failure() {
        None => tracing::debug!(%scheme, "Webhook signature verified"),
        Some(reason) => tracing::warn!(%scheme, %reason, "Webhook signature verification failed"),
    }

    result
}

/// Authenticator bound to one integration's scheme and key.
///
/// Built once at configuration time and shared (it is `Send + Sync`) across
/// concurrent requests.
#[derive(Debug)]
pub struct PayloadAuthenticator {
    scheme: Scheme,
    key: KeyMaterial,
}

impl PayloadAuthenticator {
    /// Binds `key` to `scheme`, rejecting key material of the other scheme.
    pub fn new(scheme: Scheme, key: impl Into<KeyMaterial>) -> Result<Self> {
        let key = key.into();
        match (scheme, &key) {
            (Scheme::Asymmetric, KeyMaterial::Asymmetric(_)) | (Scheme::Symmetric, KeyMaterial::Symmetric(_)) => {
                Ok(Self { scheme, key })
            }
            _ => Err(HooksealError::UnsupportedScheme(format!(
                "{} scheme cannot use the configured key material",
                scheme
            ))),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    /// Verifies a webhook body received as text.
    pub fn authenticate(&self, payload: &str, signature: &str) -> VerificationResult {
        authenticate(self.scheme, payload, signature, &self.key)
    }

    /// Verifies a webhook body received as raw bytes.
    pub fn authenticate_bytes(&self, payload: &[u8], signature: &str) -> VerificationResult {
        dispatch(self.scheme, payload.into(), signature, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{AsymmetricKeyMaterial, KeyAlgorithm, MacAlgorithm, SymmetricKeyMaterial};

    const BODY: &str = include_str!("../tests/fixtures/webhook.json");
    const HMAC_SIGNATURE: &str = "i1PzFQMpGoM3YwjcDUEtBwNMCa01kjCykHLLoA5oZtE=";
    const RSA_SIGNATURE: &str = include_str!("../tests/fixtures/webhook.json.rsa.sig");
    const SIGNER_A_PUB: &str = include_str!("../tests/fixtures/signer_a.pub.b64");

    fn hmac_key() -> KeyMaterial {
        SymmetricKeyMaterial::new(b"this is example of the HMAC key", MacAlgorithm::HmacSha256)
            .unwrap()
            .into()
    }

    fn rsa_key() -> KeyMaterial {
        AsymmetricKeyMaterial::from_encoded(SIGNER_A_PUB, KeyAlgorithm::Rsa)
            .unwrap()
            .into()
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("symmetric".parse::<Scheme>().unwrap(), Scheme::Symmetric);
        assert_eq!("HMAC".parse::<Scheme>().unwrap(), Scheme::Symmetric);
        assert_eq!("asymmetric".parse::<Scheme>().unwrap(), Scheme::Asymmetric);
        assert_eq!("rsa".parse::<Scheme>().unwrap(), Scheme::Asymmetric);
        assert!(matches!(
            "none".parse::<Scheme>(),
            Err(HooksealError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_authenticate_dispatches_by_scheme() {
        assert!(authenticate(Scheme::Symmetric, BODY, HMAC_SIGNATURE, &hmac_key()).is_valid());
        assert!(authenticate(Scheme::Asymmetric, BODY, RSA_SIGNATURE.trim(), &rsa_key()).is_valid());
    }

    #[test]
    fn test_authenticate_rejects_mismatched_key() {
        let result = authenticate(Scheme::Asymmetric, BODY, HMAC_SIGNATURE, &hmac_key());
        assert_eq!(result.failure(), Some(FailureReason::UnsupportedScheme));

        let result = authenticate(Scheme::Symmetric, BODY, RSA_SIGNATURE.trim(), &rsa_key());
        assert_eq!(result.failure(), Some(FailureReason::UnsupportedScheme));
    }

    #[test]
    fn test_authenticator_rejects_mismatched_key_at_setup() {
        let result = PayloadAuthenticator::new(Scheme::Asymmetric, hmac_key());
        assert!(matches!(result, Err(HooksealError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_authenticator_text_and_bytes_agree() {
        let authenticator = PayloadAuthenticator::new(Scheme::Symmetric, hmac_key()).unwrap();
        assert_eq!(authenticator.scheme(), Scheme::Symmetric);
        assert_eq!(
            authenticator.authenticate(BODY, HMAC_SIGNATURE),
            authenticator.authenticate_bytes(BODY.as_bytes(), HMAC_SIGNATURE)
        );
        assert!(authenticator.authenticate(BODY, HMAC_SIGNATURE).is_valid());
    }

    #[test]
    fn test_authenticator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PayloadAuthenticator>();
    }
}
