//! # vouch CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Vouch registry CLI — key and attestation tooling.
///
/// Generates secp256k1 key pairs, signs the query attestations the
/// registry guard verifies, and recovers signer identities from them.
#[derive(Parser, Debug)]
#[command(name = "vouch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate or derive a key pair and registry identity.
    Keygen(vouch_cli::keygen::KeygenArgs),
    /// Sign a query attestation for a purpose and subject.
    Attest(vouch_cli::attest::AttestArgs),
    /// Recover the signer identity from a signed attestation.
    Recover(vouch_cli::recover::RecoverArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen(args) => vouch_cli::keygen::run(&args),
        Commands::Attest(args) => vouch_cli::attest::run(&args),
        Commands::Recover(args) => vouch_cli::recover::run(&args),
    }
}
