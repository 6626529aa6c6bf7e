//! # Recover Subcommand
//!
//! Recovers the signer identity from a message hash and a recoverable
//! signature — the same check the registry guard performs, exposed for
//! debugging attestations before submitting them.

use clap::Args;
use serde::Serialize;

use vouch_crypto::{recover_signer, RecoverableSignature};

use crate::hex::parse_hex32;

/// Arguments for the recover subcommand.
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// The signed message hash (64 hex chars).
    #[arg(long)]
    pub message_hash: String,

    /// The recoverable signature (130 hex chars, r || s || v).
    #[arg(long)]
    pub signature: String,
}

#[derive(Serialize)]
struct RecoverOutput {
    signer: String,
}

/// Recover the signer and print it as JSON on stdout.
pub fn run(args: &RecoverArgs) -> anyhow::Result<()> {
    let message_hash = parse_hex32(&args.message_hash, "message hash")?;
    let signature = RecoverableSignature::from_hex(&args.signature)?;
    let signer = recover_signer(&message_hash, &signature)?;
    tracing::info!(signer = %signer, "signer recovered");

    let output = RecoverOutput {
        signer: signer.to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_crypto::SigningKeyPair;

    #[test]
    fn test_recover_matches_signer() {
        let kp = SigningKeyPair::from_seed(&[0x33; 32]).unwrap();
        let digest = [0x44u8; 32];
        let sig = kp.sign_prehash(&digest).unwrap();
        let args = RecoverArgs {
            message_hash: digest.iter().map(|b| format!("{b:02x}")).collect(),
            signature: sig.to_hex(),
        };
        run(&args).unwrap();
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let args = RecoverArgs {
            message_hash: "00".repeat(32),
            signature: "nonsense".to_string(),
        };
        assert!(run(&args).is_err());
    }
}
