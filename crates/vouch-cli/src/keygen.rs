//! # Keygen Subcommand
//!
//! Generates a secp256k1 key pair (random, or derived from a supplied
//! seed) and prints the registry identity. The private scalar is printed
//! only with `--show-secret`.

use clap::Args;
use serde::Serialize;

use vouch_crypto::SigningKeyPair;

use crate::hex::parse_hex32;

/// Arguments for the keygen subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Derive the key pair from this 64-hex-char seed instead of randomly.
    #[arg(long)]
    pub seed: Option<String>,

    /// Print the private scalar alongside the identity.
    #[arg(long, default_value_t = false)]
    pub show_secret: bool,
}

#[derive(Serialize)]
struct KeygenOutput {
    identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<String>,
}

/// Generate a key pair and print it as JSON on stdout.
pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    let key_pair = match &args.seed {
        Some(seed) => {
            let bytes = parse_hex32(seed, "seed")?;
            SigningKeyPair::from_seed(&bytes)?
        }
        None => SigningKeyPair::generate(),
    };

    tracing::info!(identity = %key_pair.identity(), seeded = args.seed.is_some(), "key pair ready");
    let output = KeygenOutput {
        identity: key_pair.identity().to_string(),
        secret: args.show_secret.then(|| key_pair.secret_hex()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
