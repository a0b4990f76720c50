//! Hookseal Core Library
//!
//! Webhook payload authentication: key material loading, canonical payload
//! encoding, RSA/SHA-256 signature verification and HMAC-SHA256 verification.

pub mod authenticator;
pub mod config;
pub mod encoding;
pub mod error;
pub mod keys;
pub mod verifier;

pub use authenticator::{PayloadAuthenticator, Scheme, authenticate};
pub use error::{FailureReason, HooksealError, Result, VerificationResult};
pub use keys::{AsymmetricKeyMaterial, KeyAlgorithm, KeyMaterial, MacAlgorithm, SymmetricKeyMaterial};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the base64 signature in the reference producer's deliveries.
pub const SIGNATURE_HEADER: &str = "x-inpost-signature";
