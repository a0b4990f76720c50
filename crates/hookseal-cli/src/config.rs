//! CLI configuration loading and resolution.
//!
//! Supports profile-based configuration from `~/.hookseal/config.huml` with
//! priority order: CLI flags > environment variables > config file.

use anyhow::{Context, Result, bail};
use hookseal_core::Scheme;
use hookseal_core::config::IntegrationSettings;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// CLI configuration loaded from config.huml file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Name of the default profile to use.
    pub default_profile: String,
    /// Map of profile name to integration settings.
    pub profiles: HashMap<String, Profile>,
}

/// A named webhook integration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Signature scheme agreed with the producer ("asymmetric" or "symmetric").
    pub scheme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_algorithm: Option<String>,
}

impl From<Profile> for IntegrationSettings {
    fn from(profile: Profile) -> Self {
        Self {
            scheme: Some(profile.scheme),
            keystore_path: profile.keystore_path.map(PathBuf::from),
            keystore_password: profile.keystore_password.map(SecretString::from),
            key_alias: profile.key_alias,
            public_key: profile.public_key,
            key_algorithm: profile.key_algorithm,
            hmac_secret: profile.hmac_secret.map(SecretString::from),
            hmac_algorithm: profile.hmac_algorithm,
        }
    }
}

/// Returns the default config file path (~/.hookseal/config.huml).
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(".hookseal/config.huml"))
        .context("Could not determine home directory")
}

/// Returns the config file path, honouring `HOOKSEAL_CONFIG`.
pub fn config_path() -> Result<PathBuf> {
    match std::env::var("HOOKSEAL_CONFIG") {
        Ok(p) => Ok(PathBuf::from(p)),
        Err(_) => default_config_path(),
    }
}

/// Load configuration from the config file.
///
/// Returns `Ok(None)` if the config file doesn't exist.
/// Returns an error if the file exists but is invalid.
pub fn load_config() -> Result<Option<CliConfig>> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let content =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;

    let config = parse_config(&content).with_context(|| format!("Invalid config in {}", path.display()))?;

    check_file_permissions(&path);

    Ok(Some(config))
}

fn parse_config(content: &str) -> Result<CliConfig> {
    let config: CliConfig = huml_rs::serde::from_str(content).context("Invalid HUML")?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that the config has at least one profile, the default profile
/// exists, and every profile names a known scheme.
fn validate_config(config: &CliConfig) -> Result<()> {
    if config.profiles.is_empty() {
        bail!("Config file must contain at least one profile");
    }

    if !config.profiles.contains_key(&config.default_profile) {
        bail!(
            "Default profile '{}' not found in profiles",
            config.default_profile
        );
    }

    for (name, profile) in &config.profiles {
        profile
            .scheme
            .parse::<Scheme>()
            .with_context(|| format!("Profile '{}' has an invalid scheme", name))?;
    }

    Ok(())
}

/// Warn if config file has overly permissive permissions (on Unix).
///
/// Profiles may hold HMAC secrets and key store passwords.
#[cfg(unix)]
fn check_file_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            tracing::warn!(
                "{} has overly permissive permissions ({:o}). Consider running: chmod 600 {}",
                path.display(),
                mode & 0o777,
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
fn check_file_permissions(_path: &std::path::Path) {}

/// Resolve integration settings by applying priority rules.
///
/// Priority order (highest to lowest):
/// 1. CLI flags (`--scheme`, `--keystore`, `--public-key`, ...)
/// 2. Environment variables (`HOOKSEAL_*`, including values from `.env`)
/// 3. Config file profile
pub fn resolve_settings(
    profile_flag: Option<&str>,
    flags: IntegrationSettings,
    file_config: Option<CliConfig>,
) -> Result<IntegrationSettings> {
    let mut settings = IntegrationSettings::default();

    if let Some(mut config) = file_config {
        let profile_name = profile_flag.unwrap_or(&config.default_profile).to_string();
        match config.profiles.remove(&profile_name) {
            Some(profile) => settings = profile.into(),
            None if profile_flag.is_some() => bail!(
                "Profile '{}' not found. Run 'hookseal config profiles' to see available profiles.",
                profile_name
            ),
            None => {}
        }
    } else if let Some(requested_profile) = profile_flag {
        bail!(
            "Profile '{}' not found. No config file exists at {}.",
            requested_profile,
            config_path()?.display()
        );
    }

    Ok(settings
        .overlay(IntegrationSettings::from_env())
        .overlay(flags))
}
