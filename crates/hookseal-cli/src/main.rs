use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hookseal_core::config::IntegrationSettings;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{
    IntegrationArgs,
    config::{ConfigCommands, handle_config_command},
    key::handle_export_key_command,
    sign::{SignArgs, handle_sign_command},
    verify::{VerifyArgs, exit_code, handle_verify_command},
};

#[derive(Parser)]
#[command(name = "hookseal")]
#[command(about = "Verify webhook signatures (RSA/SHA-256 or HMAC-SHA256)", long_about = None)]
#[command(version = hookseal_core::VERSION)]
struct Cli {
    /// Configuration profile to use
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(flatten)]
    integration: IntegrationArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a webhook body against its signature
    Verify(VerifyArgs),

    /// Compute the HMAC signature for a body (symmetric scheme only)
    Sign(SignArgs),

    /// Print the configured public key as a base64 SubjectPublicKeyInfo string
    ExportKey,

    /// Inspect CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> Result<ExitCode> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "hookseal=info,hookseal_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Config commands don't need key material, handle separately
    if let Commands::Config(cmd) = cli.command {
        handle_config_command(cmd)?;
        return Ok(ExitCode::SUCCESS);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config file: {:#}", e);
        None
    });

    let settings = config::resolve_settings(
        cli.profile.as_deref(),
        IntegrationSettings::from(cli.integration),
        file_config,
    )?;
    let integration = settings.into_config().context("Invalid integration configuration")?;

    match cli.command {
        Commands::Verify(args) => {
            let authenticator = integration.load().context("Failed to load key material")?;
            let valid = handle_verify_command(&authenticator, args)?;
            return Ok(exit_code(valid));
        }
        Commands::Sign(args) => {
            let authenticator = integration.load().context("Failed to load key material")?;
            handle_sign_command(&authenticator, args)?;
        }
        Commands::ExportKey => handle_export_key_command(&integration)?,
        Commands::Config(_) => unreachable!(), // Handled above
    }

    Ok(ExitCode::SUCCESS)
}
