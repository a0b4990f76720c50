//! Canonical payload bytes and base64 signature transport.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::FailureReason;

/// Returns the exact bytes a producer signed for the given body text.
///
/// The body is taken literally as UTF-8. No trimming, Unicode normalization or
/// line-ending conversion happens here; any of those would break signatures on
/// authentic payloads.
pub fn canonical_bytes(payload: &str) -> &[u8] {
    payload.as_bytes()
}

/// Webhook body exactly as transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPayload<'a>(&'a [u8]);

impl<'a> RawPayload<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }
}

impl<'a> From<&'a str> for RawPayload<'a> {
    fn from(text: &'a str) -> Self {
        Self(canonical_bytes(text))
    }
}

impl<'a> From<&'a [u8]> for RawPayload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}

/// Signature bytes decoded from their base64 transport form.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureBlob(Vec<u8>);

impl SignatureBlob {
    /// Decodes standard, padded base64.
    ///
    /// Missing padding, non-alphabet characters and non-canonical trailing
    /// bits are all rejected as [`FailureReason::MalformedSignature`].
    pub fn from_base64(encoded: &str) -> Result<Self, FailureReason> {
        STANDARD
            .decode(encoded)
            .map(Self)
            .map_err(|_| FailureReason::MalformedSignature)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Signature bytes stay out of logs.
impl std::fmt::Debug for SignatureBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignatureBlob({} bytes)", self.0.len())
    }
}
