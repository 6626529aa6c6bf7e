//! # Attest Subcommand
//!
//! Signs a query attestation: computes the domain-separated digest for a
//! purpose and subject, signs it with the supplied key, and prints the
//! attestation the registry guard expects.

use anyhow::bail;
use clap::Args;
use serde::Serialize;

use vouch_core::Identity;
use vouch_crypto::{attestation_digest, QueryPurpose, SigningKeyPair};

use crate::hex::parse_hex32;

/// Arguments for the attest subcommand.
#[derive(Args, Debug)]
pub struct AttestArgs {
    /// The signer's private scalar (64 hex chars).
    #[arg(long)]
    pub secret: String,

    /// Query purpose: user_data, dapp_data, or user_review.
    #[arg(long)]
    pub purpose: String,

    /// The queried record's identity (40 hex chars).
    #[arg(long)]
    pub subject: String,
}

#[derive(Serialize)]
struct AttestOutput {
    signer: String,
    message_hash: String,
    signature: String,
}

/// Sign an attestation and print it as JSON on stdout.
pub fn run(args: &AttestArgs) -> anyhow::Result<()> {
    let purpose = parse_purpose(&args.purpose)?;
    let subject =
        Identity::from_hex(&args.subject).map_err(|e| anyhow::anyhow!("invalid subject: {e}"))?;
    let seed = parse_hex32(&args.secret, "secret")?;
    let key_pair = SigningKeyPair::from_seed(&seed)?;

    let digest = attestation_digest(purpose, &subject);
    let signature = key_pair.sign_prehash(&digest)?;
    tracing::info!(signer = %key_pair.identity(), purpose = purpose.as_str(), subject = %subject, "attestation signed");

    let output = AttestOutput {
        signer: key_pair.identity().to_string(),
        message_hash: digest.iter().map(|b| format!("{b:02x}")).collect(),
        signature: signature.to_hex(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_purpose(s: &str) -> anyhow::Result<QueryPurpose> {
    let purpose = match s {
        "user_data" => QueryPurpose::UserData,
        "dapp_data" => QueryPurpose::DappData,
        "user_review" => QueryPurpose::UserReview,
        other => bail!("unknown purpose {other:?}; expected user_data, dapp_data, or user_review"),
    };
    Ok(purpose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_purpose_covers_all_tags() {
        for purpose in [
            QueryPurpose::UserData,
            QueryPurpose::DappData,
            QueryPurpose::UserReview,
        ] {
            assert_eq!(parse_purpose(purpose.as_str()).unwrap(), purpose);
        }
        assert!(parse_purpose("everything").is_err());
    }

    #[test]
    fn test_attest_with_seeded_key() {
        let args = AttestArgs {
            secret: "22".repeat(32),
            purpose: "user_data".to_string(),
            subject: "ab".repeat(20),
        };
        run(&args).unwrap();
    }
}
