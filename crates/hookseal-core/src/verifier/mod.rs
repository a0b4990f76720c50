//! Webhook signature verification.

pub mod asymmetric;
pub mod symmetric;

pub use asymmetric::AsymmetricVerifier;
pub use symmetric::SymmetricVerifier;
