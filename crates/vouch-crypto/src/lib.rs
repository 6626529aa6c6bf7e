//! # vouch-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for the registry:
//!
//! - **Recoverable secp256k1 ECDSA** signing and signer-identity recovery —
//!   the primitive the authorization guard is built on.
//! - **Query attestation digests** — domain-separated SHA-256 binding a
//!   query purpose to the record being queried.
//!
//! ## Crate Policy
//!
//! - Depends only on `vouch-core` internally.
//! - No mocking of cryptographic operations in tests — all tests use real
//!   SHA-256 and real secp256k1 signatures.
//! - `unsafe` prohibited.

pub mod attestation;
pub mod ecdsa;

pub use attestation::{attestation_digest, QueryPurpose, SignedAttestation};
pub use ecdsa::{
    identity_from_verifying_key, recover_signer, verify_signer, RecoverableSignature,
    SigningKeyPair,
};
