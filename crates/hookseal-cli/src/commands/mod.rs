//! CLI command implementations.

pub mod config;
pub mod key;
pub mod sign;
pub mod verify;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use hookseal_core::config::IntegrationSettings;
use secrecy::SecretString;

/// Integration flags shared by every command. The HMAC secret is not accepted
/// as a flag; set it through the environment or a profile.
#[derive(Args, Debug, Default)]
pub struct IntegrationArgs {
    /// Signature scheme agreed with the producer (asymmetric or symmetric)
    #[arg(long, global = true)]
    pub scheme: Option<String>,

    /// PKCS#12 key store holding the producer's certificate
    #[arg(long, global = true)]
    pub keystore: Option<PathBuf>,

    /// Key store password
    #[arg(long, env = "HOOKSEAL_KEYSTORE_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Alias of the certificate entry in the key store
    #[arg(long, global = true)]
    pub alias: Option<String>,

    /// Base64 SubjectPublicKeyInfo of the producer's public key
    #[arg(long, global = true)]
    pub public_key: Option<String>,

    /// Public key algorithm
    #[arg(long, global = true)]
    pub key_algorithm: Option<String>,

    /// HMAC algorithm
    #[arg(long, global = true)]
    pub hmac_algorithm: Option<String>,
}

impl From<IntegrationArgs> for IntegrationSettings {
    fn from(args: IntegrationArgs) -> Self {
        Self {
            scheme: args.scheme,
            keystore_path: args.keystore,
            keystore_password: args.password.map(SecretString::from),
            key_alias: args.alias,
            public_key: args.public_key,
            key_algorithm: args.key_algorithm,
            hmac_algorithm: args.hmac_algorithm,
            ..Default::default()
        }
    }
}

/// Reads a webhook body byte for byte, from a file or `-` for stdin.
///
/// The bytes are not required to be UTF-8; a body that isn't simply fails
/// verification.
pub fn read_body(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut body = Vec::new();
        std::io::stdin()
            .read_to_end(&mut body)
            .context("Failed to read body from stdin")?;
        return Ok(body);
    }

    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
