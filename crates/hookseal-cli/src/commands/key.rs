//! `hookseal export-key`: print a key store entry as a public key string.

use anyhow::{Context, Result};
use hookseal_core::config::{IntegrationConfig, KeySource};
use hookseal_core::{KeyMaterial, Scheme};

/// Prints the base64 SubjectPublicKeyInfo of the configured public key, in
/// the form accepted by `HOOKSEAL_PUBLIC_KEY`.
pub fn handle_export_key_command(config: &IntegrationConfig) -> Result<()> {
    if config.scheme != Scheme::Asymmetric {
        anyhow::bail!("export-key needs the asymmetric scheme");
    }
    if !matches!(config.key, KeySource::Container { .. }) {
        tracing::info!("Public key is not loaded from a key store; re-encoding it");
    }

    let authenticator = config.load().context("Failed to load public key")?;
    let KeyMaterial::Asymmetric(key) = authenticator.key() else {
        anyhow::bail!("Configured key is not a public key");
    };

    println!("{}", key.to_encoded()?);
    Ok(())
}
