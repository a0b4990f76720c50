//! Integration configuration.
//!
//! Settings are collected from several layers (environment, config file,
//! command-line flags), merged with [`IntegrationSettings::overlay`], then
//! validated into an [`IntegrationConfig`] which loads the key material once.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::authenticator::{PayloadAuthenticator, Scheme};
use crate::error::{HooksealError, Result};
use crate::keys::{AsymmetricKeyMaterial, KeyAlgorithm, MacAlgorithm, SymmetricKeyMaterial};

/// Unvalidated integration settings. Every field is optional so that layers
/// can be merged before validation.
#[derive(Debug, Default)]
pub struct IntegrationSettings {
    pub scheme: Option<String>,
    pub keystore_path: Option<PathBuf>,
    pub keystore_password: Option<SecretString>,
    pub key_alias: Option<String>,
    pub public_key: Option<String>,
    pub key_algorithm: Option<String>,
    pub hmac_secret: Option<SecretString>,
    pub hmac_algorithm: Option<String>,
}

impl IntegrationSettings {
    /// Reads settings from `HOOKSEAL_*` environment variables.
    ///
    /// Empty variables are treated as unset.
    pub fn from_env() -> Self {
        Self {
            scheme: env_var("HOOKSEAL_SCHEME"),
            keystore_path: env_var("HOOKSEAL_KEYSTORE_PATH").map(PathBuf::from),
            keystore_password: env_var("HOOKSEAL_KEYSTORE_PASSWORD").map(SecretString::from),
            key_alias: env_var("HOOKSEAL_KEY_ALIAS"),
            public_key: env_var("HOOKSEAL_PUBLIC_KEY"),
            key_algorithm: env_var("HOOKSEAL_KEY_ALGORITHM"),
            hmac_secret: env_var("HOOKSEAL_HMAC_SECRET").map(SecretString::from),
            hmac_algorithm: env_var("HOOKSEAL_HMAC_ALGORITHM"),
        }
    }

    /// Returns these settings with every field set in `higher` replaced.
    pub fn overlay(self, higher: IntegrationSettings) -> Self {
        Self {
            scheme: higher.scheme.or(self.scheme),
            keystore_path: higher.keystore_path.or(self.keystore_path),
            keystore_password: higher.keystore_password.or(self.keystore_password),
            key_alias: higher.key_alias.or(self.key_alias),
            public_key: higher.public_key.or(self.public_key),
            key_algorithm: higher.key_algorithm.or(self.key_algorithm),
            hmac_secret: higher.hmac_secret.or(self.hmac_secret),
            hmac_algorithm: higher.hmac_algorithm.or(self.hmac_algorithm),
        }
    }

    /// Validates the settings.
    pub fn into_config(self) -> Result<IntegrationConfig> {
        let scheme: Scheme = self
            .scheme
            .as_deref()
            .ok_or_else(|| HooksealError::Configuration("HOOKSEAL_SCHEME is required".to_string()))?
            .parse()?;

        let key = match scheme {
            Scheme::Asymmetric => {
                let algorithm = match self.key_algorithm.as_deref() {
                    Some(name) => name.parse()?,
                    None => KeyAlgorithm::Rsa,
                };
                public_key_source(
                    self.keystore_path,
                    self.keystore_password,
                    self.key_alias,
                    self.public_key,
                    algorithm,
                )?
            }
            Scheme::Symmetric => {
                let algorithm = match self.hmac_algorithm.as_deref() {
                    Some(name) => name.parse()?,
                    None => MacAlgorithm::HmacSha256,
                };
                let secret = self.hmac_secret.ok_or_else(|| {
                    HooksealError::Configuration(
                        "HOOKSEAL_HMAC_SECRET is required for the symmetric scheme".to_string(),
                    )
                })?;
                KeySource::Secret { secret, algorithm }
            }
        };

        Ok(IntegrationConfig { scheme, key })
    }
}

fn public_key_source(
    keystore_path: Option<PathBuf>,
    keystore_password: Option<SecretString>,
    key_alias: Option<String>,
    public_key: Option<String>,
    algorithm: KeyAlgorithm,
) -> Result<KeySource> {
    match (keystore_path, keystore_password, key_alias, public_key) {
        (Some(path), Some(password), Some(alias), None) => Ok(KeySource::Container {
            path,
            password,
            alias,
        }),
        (None, None, None, Some(encoded)) => Ok(KeySource::Encoded { encoded, algorithm }),
        (None, None, None, None) => Err(HooksealError::Configuration(
            "Asymmetric scheme needs a key store (HOOKSEAL_KEYSTORE_PATH, HOOKSEAL_KEYSTORE_PASSWORD, HOOKSEAL_KEY_ALIAS) or HOOKSEAL_PUBLIC_KEY".to_string(),
        )),
        (_, _, _, Some(_)) => Err(HooksealError::Configuration(
            "Set either a key store or HOOKSEAL_PUBLIC_KEY, not both".to_string(),
        )),
        _ => Err(HooksealError::Configuration(
            "Partial key store configuration. Set all of: HOOKSEAL_KEYSTORE_PATH, HOOKSEAL_KEYSTORE_PASSWORD, HOOKSEAL_KEY_ALIAS".to_string(),
        )),
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Where an integration's key comes from.
#[derive(Debug)]
pub enum KeySource {
    Container {
        path: PathBuf,
        password: SecretString,
        alias: String,
    },
    Encoded {
        encoded: String,
        algorithm: KeyAlgorithm,
    },
    Secret {
        secret: SecretString,
        algorithm: MacAlgorithm,
    },
}

/// Validated configuration for one webhook integration.
#[derive(Debug)]
pub struct IntegrationConfig {
    pub scheme: Scheme,
    pub key: KeySource,
}

impl IntegrationConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        IntegrationSettings::from_env().into_config()
    }

    /// Loads the key material and binds it to the scheme.
    ///
    /// Key loading failures are returned as errors, not folded into
    /// verification results.
    pub fn load(&self) -> Result<PayloadAuthenticator> {
        match &self.key {
            KeySource::Container {
                path,
                password,
                alias,
            } => {
                let key = AsymmetricKeyMaterial::from_container_file(path, password.expose_secret(), alias)?;
                PayloadAuthenticator::new(self.scheme, key)
            }
            KeySource::Encoded { encoded, algorithm } => {
                let key = AsymmetricKeyMaterial::from_encoded(encoded, *algorithm)?;
                PayloadAuthenticator::new(self.scheme, key)
            }
            KeySource::Secret { secret, algorithm } => {
                let key = SymmetricKeyMaterial::new(secret.expose_secret().as_bytes(), *algorithm)?;
                PayloadAuthenticator::new(self.scheme, key)
            }
        }
    }
}
