//! `hookseal sign`: compute the HMAC a producer would send.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use hookseal_core::KeyMaterial;
use hookseal_core::PayloadAuthenticator;
use hookseal_core::verifier::SymmetricVerifier;

#[derive(Args, Debug)]
pub struct SignArgs {
    /// File holding the webhook body, or `-` for stdin
    #[arg(long)]
    pub body: PathBuf,
}

pub fn handle_sign_command(authenticator: &PayloadAuthenticator, args: SignArgs) -> Result<()> {
    let KeyMaterial::Symmetric(key) = authenticator.key() else {
        bail!("Signing is only available for the symmetric scheme");
    };

    let body = super::read_body(&args.body)?;
    println!("{}", SymmetricVerifier::new(key).sign(body.as_slice())?);
    Ok(())
}
