//! Key material for webhook verification.
//!
//! Public keys come from one of two places, a password-protected PKCS#12 key
//! store or a standalone base64 SubjectPublicKeyInfo string. Both produce the
//! same [`AsymmetricKeyMaterial`]. Shared HMAC secrets are wrapped in
//! [`SymmetricKeyMaterial`].

mod container;

use std::path::Path;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rsa::RsaPublicKey;
use rsa::pkcs1v15::VerifyingKey;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use secrecy::{ExposeSecret, SecretBox};
use serde::Serialize;
use sha2::Sha256;

use crate::error::{HooksealError, Result};

/// Public-key algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyAlgorithm {
    #[serde(rename = "RSA")]
    Rsa,
}

impl KeyAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "RSA",
        }
    }
}

impl FromStr for KeyAlgorithm {
    type Err = HooksealError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("rsa") {
            Ok(KeyAlgorithm::Rsa)
        } else {
            Err(HooksealError::UnsupportedAlgorithm(s.to_string()))
        }
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keyed-MAC algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MacAlgorithm {
    #[serde(rename = "HmacSHA256")]
    HmacSha256,
}

impl MacAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            MacAlgorithm::HmacSha256 => "HmacSHA256",
        }
    }
}

impl FromStr for MacAlgorithm {
    type Err = HooksealError;

    /// Accepts `HmacSHA256`, `HMAC-SHA256` and `hmac_sha256`, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "hmacsha256" => Ok(MacAlgorithm::HmacSha256),
            _ => Err(HooksealError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl std::fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A public key ready for RSA/SHA-256 signature verification.
#[derive(Debug, Clone)]
pub struct AsymmetricKeyMaterial {
    algorithm: KeyAlgorithm,
    verifying_key: VerifyingKey<Sha256>,
}

impl AsymmetricKeyMaterial {
    /// Loads the public key of the certificate stored under `alias` in a
    /// DER-encoded PKCS#12 key store.
    pub fn from_container(der: &[u8], password: &str, alias: &str) -> Result<Self> {
        let spki = container::public_key_for_alias(der, password, alias)?;
        let key = Self::from_spki_der(&spki, KeyAlgorithm::Rsa)?;
        tracing::debug!(alias, algorithm = %key.algorithm, "Loaded public key from key store");
        Ok(key)
    }

    /// Reads a PKCS#12 key store from disk and loads the entry under `alias`.
    ///
    /// This is the only blocking operation in the crate. Load once at startup
    /// and share the result.
    pub fn from_container_file(path: impl AsRef<Path>, password: &str, alias: &str) -> Result<Self> {
        let path = path.as_ref();
        let der = std::fs::read(path).map_err(|e| {
            HooksealError::KeyContainer(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_container(&der, password, alias)
    }

    /// Rebuilds a public key from base64 X.509 SubjectPublicKeyInfo DER.
    pub fn from_encoded(encoded: &str, algorithm: KeyAlgorithm) -> Result<Self> {
        let der = STANDARD
            .decode(encoded.trim())
            .map_err(|e| HooksealError::MalformedKey(format!("Invalid base64 key: {}", e)))?;
        Self::from_spki_der(&der, algorithm)
    }

    fn from_spki_der(der: &[u8], algorithm: KeyAlgorithm) -> Result<Self> {
        let public_key = match algorithm {
            KeyAlgorithm::Rsa => RsaPublicKey::from_public_key_der(der).map_err(|e| {
                HooksealError::MalformedKey(format!("Invalid RSA public key: {}", e))
            })?,
        };

        Ok(Self {
            algorithm,
            verifying_key: VerifyingKey::new(public_key),
        })
    }

    /// Encodes the key as base64 SubjectPublicKeyInfo DER, the form accepted
    /// by [`AsymmetricKeyMaterial::from_encoded`].
    pub fn to_encoded(&self) -> Result<String> {
        let der = self
            .public_key()
            .to_public_key_der()
            .map_err(|e| HooksealError::MalformedKey(format!("Failed to encode public key: {}", e)))?;
        Ok(STANDARD.encode(der.as_bytes()))
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        self.verifying_key.as_ref()
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey<Sha256> {
        &self.verifying_key
    }
}

impl PartialEq for AsymmetricKeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.public_key() == other.public_key()
    }
}

impl Eq for AsymmetricKeyMaterial {}

/// A shared HMAC secret.
///
/// The secret is zeroized on drop and never printed.
pub struct SymmetricKeyMaterial {
    algorithm: MacAlgorithm,
    secret: SecretBox<[u8]>,
}

impl SymmetricKeyMaterial {
    /// Wraps raw secret bytes as a key for `algorithm`.
    pub fn new(secret: &[u8], algorithm: MacAlgorithm) -> Result<Self> {
        if secret.is_empty() {
            return Err(HooksealError::InvalidKey(format!(
                "{} secret must not be empty",
                algorithm
            )));
        }

        Ok(Self {
            algorithm,
            secret: SecretBox::new(secret.into()),
        })
    }

    pub fn algorithm(&self) -> MacAlgorithm {
        self.algorithm
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.secret.expose_secret()
    }
}

impl std::fmt::Debug for SymmetricKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymmetricKeyMaterial({}, [REDACTED])", self.algorithm)
    }
}

/// Key material for either scheme.
#[derive(Debug)]
pub enum KeyMaterial {
    Asymmetric(AsymmetricKeyMaterial),
    Symmetric(SymmetricKeyMaterial),
}

impl From<AsymmetricKeyMaterial> for KeyMaterial {
    fn from(key: AsymmetricKeyMaterial) -> Self {
        KeyMaterial::Asymmetric(key)
    }
}

impl From<SymmetricKeyMaterial> for KeyMaterial {
    fn from(key: SymmetricKeyMaterial) -> Self {
        KeyMaterial::Symmetric(key)
    }
}
