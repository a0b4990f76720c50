//! Error and result types for the Hookseal core library.
//!
//! [`HooksealError`] covers setup failures (loading keys, reading
//! configuration). Per-request verification never returns an error; it yields
//! a [`VerificationResult`] carrying a [`FailureReason`] instead.

use serde::Serialize;
use thiserror::Error;

/// Setup and configuration errors.
///
/// Messages never include secret material or key bytes.
#[derive(Error, Debug)]
pub enum HooksealError {
    #[error("Key container error: {0}")]
    KeyContainer(String),

    #[error("Key not found: no entry with alias '{0}'")]
    KeyNotFound(String),

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Hookseal setup operations.
pub type Result<T> = std::result::Result<T, HooksealError>;

/// Why a payload was rejected.
///
/// All variants mean the payload is unauthenticated; the distinction exists
/// for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The signature was not valid base64 or had the wrong shape.
    MalformedSignature,
    /// The signature was well formed but did not match the payload.
    SignatureMismatch,
    /// The verifier failed while computing the expected signature.
    SignatureComputation,
    /// The key material does not belong to the requested scheme.
    UnsupportedScheme,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::MalformedSignature => "malformed_signature",
            FailureReason::SignatureMismatch => "signature_mismatch",
            FailureReason::SignatureComputation => "signature_computation",
            FailureReason::UnsupportedScheme => "unsupported_scheme",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of verifying one payload.
///
/// There is no `Default`: a result is either built as [`VerificationResult::valid`]
/// by a passing cryptographic check or carries a [`FailureReason`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<FailureReason>,
}

impl VerificationResult {
    pub(crate) fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub(crate) fn invalid(reason: FailureReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    /// Returns true only when the signature verified.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the rejection reason, or `None` for a valid result.
    pub fn failure(&self) -> Option<FailureReason> {
        self.reason
    }
}

impl From<FailureReason> for VerificationResult {
    fn from(reason: FailureReason) -> Self {
        Self::invalid(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_result_carries_reason() {
        let result = VerificationResult::invalid(FailureReason::SignatureMismatch);
        assert!(!result.is_valid());
        assert_eq!(result.failure(), Some(FailureReason::SignatureMismatch));
    }

    #[test]
    fn test_valid_result_has_no_reason() {
        let result = VerificationResult::valid();
        assert!(result.is_valid());
        assert!(result.failure().is_none());
    }

    #[test]
    fn test_result_serializes_reason() {
        let json = serde_json::to_value(VerificationResult::invalid(
            FailureReason::MalformedSignature,
        ))
        .unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["reason"], "malformed_signature");

        let json = serde_json::to_value(VerificationResult::valid()).unwrap();
        assert_eq!(json["valid"], true);
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_key_not_found_names_alias() {
        let err = HooksealError::KeyNotFound("your-alias".to_string());
        assert_eq!(err.to_string(), "Key not found: no entry with alias 'your-alias'");
    }
}
