//! `hookseal config` commands for inspecting CLI configuration.

use anyhow::Result;
use clap::Subcommand;

use crate::config::{Profile, config_path, load_config};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show {
        /// Show actual secret values (by default secrets are masked)
        #[arg(long)]
        show_secrets: bool,
    },

    /// List all available profiles
    Profiles,

    /// Show config file path
    Path,
}

pub fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { show_secrets } => show_config(show_secrets),
        ConfigCommands::Profiles => list_profiles(),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(show_secrets: bool) -> Result<()> {
    let path = config_path()?;
    let Some(config) = load_config()? else {
        println!("No config file at {}", path.display());
        return Ok(());
    };

    println!("Config file: {}", path.display());
    println!("Default profile: {}", config.default_profile);
    println!();

    let mut names: Vec<_> = config.profiles.keys().collect();
    names.sort();

    for name in names {
        println!("[{}]", name);
        for line in profile_lines(&config.profiles[name], show_secrets) {
            println!("  {}", line);
        }
        println!();
    }

    Ok(())
}

fn list_profiles() -> Result<()> {
    let Some(config) = load_config()? else {
        println!("No profiles configured.");
        return Ok(());
    };

    let mut names: Vec<_> = config.profiles.iter().collect();
    names.sort_by_key(|(name, _)| name.as_str());

    for (name, profile) in names {
        let marker = if *name == config.default_profile { "*" } else { " " };
        println!("{} {:<20} {}", marker, name, profile.scheme);
    }

    Ok(())
}

fn show_path() -> Result<()> {
    println!("{}", config_path()?.display());
    Ok(())
}

fn profile_lines(profile: &Profile, show_secrets: bool) -> Vec<String> {
    let secret = |value: &str| {
        if show_secrets {
            value.to_string()
        } else {
            mask_secret(value)
        }
    };

    let mut lines = vec![format!("scheme:            {}", profile.scheme)];
    if let Some(path) = &profile.keystore_path {
        lines.push(format!("keystore_path:     {}", path));
    }
    if let Some(password) = &profile.keystore_password {
        lines.push(format!("keystore_password: {}", secret(password)));
    }
    if let Some(alias) = &profile.key_alias {
        lines.push(format!("key_alias:         {}", alias));
    }
    if let Some(key) = &profile.public_key {
        lines.push(format!("public_key:        {}...", key.chars().take(24).collect::<String>()));
    }
    if let Some(algorithm) = &profile.key_algorithm {
        lines.push(format!("key_algorithm:     {}", algorithm));
    }
    if let Some(hmac_secret) = &profile.hmac_secret {
        lines.push(format!("hmac_secret:       {}", secret(hmac_secret)));
    }
    if let Some(algorithm) = &profile.hmac_algorithm {
        lines.push(format!("hmac_algorithm:    {}", algorithm));
    }
    lines
}

/// Mask a secret for display.
///
/// Secrets are shared keys, so unlike API tokens no characters are revealed.
fn mask_secret(secret: &str) -> String {
    "*".repeat(secret.chars().count().clamp(3, 12))
}
