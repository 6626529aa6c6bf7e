//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the registry. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Authorization failures never reveal which check failed beyond the
//!   variant itself.
//! - State machine rejections carry the identities involved so a caller
//!   can tell *who* holds the blocking claim.
//! - Payment rejections carry expected vs attached amounts.

use thiserror::Error;

use crate::credential::CredentialKind;
use crate::identity::Identity;

/// Top-level error type for registry operations.
///
/// Every public operation fails atomically: when one of these is returned,
/// no state was mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Identity or signature proof failed.
    #[error("unauthorized: signature proof does not establish the claimed identity")]
    Unauthorized,

    /// A claim was blocked by a live (unexpired) cert of the same type.
    #[error("a valid {kind} cert for user {user} already exists, held by certifier {certified_by}")]
    ValidCertExists {
        /// The user whose cert blocked the claim.
        user: Identity,
        /// The certifier holding the blocking cert.
        certified_by: Identity,
        /// The credential type that was claimed.
        kind: CredentialKind,
    },

    /// Pass/fail resolution attempted without a matching owned PENDING cert.
    #[error("no pending {kind} cert for user {user} owned by the calling certifier")]
    PendingCertMissing {
        /// The user whose cert sequence was searched.
        user: Identity,
        /// The credential type that was resolved.
        kind: CredentialKind,
    },

    /// A certifier operation was attempted by a non-whitelisted identity.
    #[error("certifier {certifier} is not whitelisted")]
    NotWhitelisted {
        /// The identity that attempted the operation.
        certifier: Identity,
    },

    /// Register/renew called with an incorrect attached value.
    #[error("payment mismatch: expected {expected} units, got {attached}")]
    PaymentMismatch {
        /// The exact amount the operation requires.
        expected: u128,
        /// The amount the caller attached.
        attached: u128,
    },

    /// The application lacks consent, or the caller is not the declared
    /// application admin, or the operator check failed.
    #[error("not permitted: {reason}")]
    NotPermitted {
        /// Why the operation was refused.
        reason: String,
    },

    /// Deadline arithmetic failed (clock out of representable range).
    #[error("temporal error: {0}")]
    Temporal(#[from] TemporalError),
}

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature verification or recovery failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// The recovery id byte is not one of 0, 1, 27, 28.
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Signature component out of range or malleable.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}

/// Error in temporal parsing and arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// The string is not a valid UTC timestamp.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Deadline arithmetic overflowed the representable range.
    #[error("timestamp arithmetic out of range")]
    OutOfRange,
}
