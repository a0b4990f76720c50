//! PKCS#12 key store access.

use std::sync::OnceLock;

use openssl::pkcs12::Pkcs12;
use openssl::pkey::Id;
use openssl::provider::Provider;
use openssl::x509::X509;

use crate::error::{HooksealError, Result};

/// Opens a DER-encoded PKCS#12 store and returns the SubjectPublicKeyInfo DER
/// of the certificate whose friendly name matches `alias`.
///
/// Aliases are compared ignoring ASCII case. Both key entries and
/// certificate-only entries are searched.
pub(super) fn public_key_for_alias(der: &[u8], password: &str, alias: &str) -> Result<Vec<u8>> {
    let store = Pkcs12::from_der(der)
        .map_err(|e| HooksealError::KeyContainer(format!("Invalid key store format: {}", e)))?;

    ensure_legacy_provider();

    // A wrong password surfaces as a MAC failure here.
    let parsed = store.parse2(password).map_err(|e| {
        HooksealError::KeyContainer(format!("Failed to open key store: {}", e))
    })?;

    let cert = parsed
        .cert
        .into_iter()
        .chain(parsed.ca.into_iter().flatten())
        .find(|cert| alias_matches(cert, alias))
        .ok_or_else(|| HooksealError::KeyNotFound(alias.to_string()))?;

    let public_key = cert.public_key().map_err(|e| {
        HooksealError::KeyContainer(format!("Failed to read certificate key: {}", e))
    })?;

    if public_key.id() != Id::RSA {
        return Err(HooksealError::UnsupportedAlgorithm(format!(
            "Entry '{}' does not hold an RSA key",
            alias
        )));
    }

    public_key
        .public_key_to_der()
        .map_err(|e| HooksealError::MalformedKey(format!("Failed to encode public key: {}", e)))
}

/// Loads OpenSSL's legacy provider once, keeping the default provider
/// available. Older Java key stores encrypt certificates with RC2-40, which
/// OpenSSL 3 only decrypts through this provider.
///
/// Loading is best effort: without it, modern (AES/PBES2) stores still open and
/// legacy ones fail with `KeyContainer`.
fn ensure_legacy_provider() {
    static LEGACY: OnceLock<Option<Provider>> = OnceLock::new();

    LEGACY.get_or_init(|| match Provider::try_load(None, "legacy", true) {
        Ok(provider) => Some(provider),
        Err(e) => {
            tracing::debug!("OpenSSL legacy provider unavailable: {}", e);
            None
        }
    });
}

fn alias_matches(cert: &X509, alias: &str) -> bool {
    cert.alias()
        .and_then(|name| std::str::from_utf8(name).ok())
        .is_some_and(|name| name.eq_ignore_ascii_case(alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYSTORE: &[u8] = include_bytes!("../../tests/fixtures/keystore.p12");
    const EC_KEYSTORE: &[u8] = include_bytes!("../../tests/fixtures/ec-keystore.p12");

    #[test]
    fn test_wrong_password() {
        let result = public_key_for_alias(KEYSTORE, "wrong-password", "your-alias");
        assert!(matches!(result, Err(HooksealError::KeyContainer(_))));
    }

    #[test]
    fn test_corrupt_store() {
        let result = public_key_for_alias(b"definitely not a key store", "testpasswd", "your-alias");
        assert!(matches!(result, Err(HooksealError::KeyContainer(_))));
    }

    #[test]
    fn test_truncated_store() {
        let result = public_key_for_alias(&KEYSTORE[..KEYSTORE.len() / 2], "testpasswd", "your-alias");
        assert!(matches!(result, Err(HooksealError::KeyContainer(_))));
    }

    #[test]
    fn test_missing_alias() {
        let result = public_key_for_alias(KEYSTORE, "testpasswd", "missing-alias");
        match result {
            Err(HooksealError::KeyNotFound(alias)) => assert_eq!(alias, "missing-alias"),
            other => panic!("expected KeyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_non_rsa_entry() {
        let result = public_key_for_alias(EC_KEYSTORE, "testpasswd", "ec-alias");
        assert!(matches!(result, Err(HooksealError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_legacy_rc2_store() {
        let store = include_bytes!("../../tests/fixtures/legacy-keystore.p12");
        let expected = public_key_for_alias(KEYSTORE, "testpasswd", "your-alias").unwrap();

        // Opens when the OpenSSL build ships the legacy provider, otherwise
        // fails as a container error rather than anything softer.
        match public_key_for_alias(store, "testpasswd", "legacy-alias") {
            Ok(der) => assert_eq!(der, expected),
            Err(HooksealError::KeyContainer(message)) => {
                assert!(message.contains("Failed to open key store"), "{message}")
            }
            Err(other) => panic!("expected key or KeyContainer, got {:?}", other),
        }
    }

    #[test]
    fn test_returns_spki_der() {
        let der = public_key_for_alias(KEYSTORE, "testpasswd", "your-alias").unwrap();
        // SEQUENCE tag of the SubjectPublicKeyInfo
        assert_eq!(der[0], 0x30);
    }
}
