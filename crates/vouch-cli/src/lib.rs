//! # vouch-cli — Registry Command-Line Interface
//!
//! Key management and attestation tooling for participants in the Vouch
//! credential registry: users, certifiers, and application admins all
//! authenticate read queries with recoverable signatures, and this CLI
//! produces and checks them.
//!
//! ## Subcommands
//!
//! - `keygen` — Generate or derive a secp256k1 key pair and identity
//! - `attest` — Sign a query attestation for a purpose and subject
//! - `recover` — Recover the signer identity from a signed attestation
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates — no business logic here.
//! - Private key material is printed only when explicitly requested and is
//!   never logged.

pub mod attest;
pub mod keygen;
pub mod recover;

mod hex;
