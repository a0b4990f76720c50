//! `hookseal verify`: check a stored webhook body against its signature.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use hookseal_core::{PayloadAuthenticator, VerificationResult};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// File holding the webhook body, or `-` for stdin
    #[arg(long)]
    pub body: PathBuf,

    /// Base64 signature sent with the webhook
    #[arg(long)]
    pub signature: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Verifies the body and prints the outcome. Returns whether it was valid.
pub fn handle_verify_command(authenticator: &PayloadAuthenticator, args: VerifyArgs) -> Result<bool> {
    let body = super::read_body(&args.body)?;
    let result = authenticator.authenticate_bytes(&body, &args.signature);

    if args.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", describe(&result));
    }

    Ok(result.is_valid())
}

/// Process exit code for a verification outcome: 0 valid, 1 rejected.
pub fn exit_code(valid: bool) -> ExitCode {
    if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn describe(result: &VerificationResult) -> String {
    match result.failure() {
        None => "Signature verification result: valid".to_string(),
        Some(reason) => format!("Signature verification result: invalid ({})", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookseal_core::{MacAlgorithm, Scheme, SymmetricKeyMaterial};

    const BODY: &str = include_str!("../../../hookseal-core/tests/fixtures/webhook.json");
    const SIGNATURE: &str = "i1PzFQMpGoM3YwjcDUEtBwNMCa01kjCykHLLoA5oZtE=";

    fn authenticator() -> PayloadAuthenticator {
        let key = SymmetricKeyMaterial::new(b"this is example of the HMAC key", MacAlgorithm::HmacSha256).unwrap();
        PayloadAuthenticator::new(Scheme::Symmetric, key).unwrap()
    }

    fn run(body: &[u8], signature: &str) -> bool {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body");
        std::fs::write(&path, body).unwrap();

        let args = VerifyArgs {
            body: path,
            signature: signature.to_string(),
            json: false,
        };
        handle_verify_command(&authenticator(), args).unwrap()
    }

    #[test]
    fn test_verify_command_valid() {
        assert!(run(BODY.as_bytes(), SIGNATURE));
        assert_eq!(exit_code(true), ExitCode::SUCCESS);
    }

    #[test]
    fn test_verify_command_rejected() {
        assert!(!run(b"{}", SIGNATURE));
        assert!(!run(BODY.as_bytes(), "not base64!"));
        assert_eq!(exit_code(false), ExitCode::FAILURE);
    }

    #[test]
    fn test_verify_command_non_utf8_body_is_rejected() {
        assert!(!run(&[0x7b, 0xff, 0xfe, 0x7d], SIGNATURE));
    }

    #[test]
    fn test_describe() {
        let authenticator = authenticator();
        assert_eq!(
            describe(&authenticator.authenticate(BODY, SIGNATURE)),
            "Signature verification result: valid"
        );
        assert_eq!(
            describe(&authenticator.authenticate("{}", SIGNATURE)),
            "Signature verification result: invalid (signature_mismatch)"
        );
        assert_eq!(
            describe(&authenticator.authenticate(BODY, "%%")),
            "Signature verification result: invalid (malformed_signature)"
        );
    }
}
