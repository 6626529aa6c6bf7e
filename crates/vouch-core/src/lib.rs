//! # vouch-core — Foundational Types for the Vouch Credential Registry
//!
//! This crate is the bedrock of the registry workspace. It defines the core
//! type-system primitives; every other crate depends on `vouch-core`, and it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype for identities.** `Identity` is a 20-byte address with a
//!    validated hex constructor. No bare strings for identifiers.
//!
//! 2. **Single `CredentialKind` enum.** One definition, four variants,
//!    exhaustive `match` everywhere. Its order fixes the layout of the
//!    validity vector pushed to consuming applications.
//!
//! 3. **UTC-only timestamps behind a `Clock` seam.** Deadlines come from
//!    the environment clock, never from caller-supplied values.
//!
//! 4. **Structured errors.** The registry error taxonomy lives here so that
//!    every crate reports failures in the same vocabulary.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vouch-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod credential;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod visibility;

// Re-export primary types for ergonomic imports.
pub use credential::{CredentialKind, ValidityVector, CREDENTIAL_KIND_COUNT};
pub use error::{CryptoError, RegistryError, TemporalError};
pub use identity::Identity;
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
pub use visibility::VisibilityField;
