//! # vouch-registry — Credential Registry Core
//!
//! The registry proper: a single in-memory state machine that certifiers,
//! users, consuming applications, and the operator drive through a small
//! set of atomic operations.
//!
//! ## Architecture
//!
//! ```text
//!   store       keyed records, fees, event log, Registry aggregate
//!   cert        claim / pass / fail lifecycle and validity vectors
//!   guard       signature-recovery authorization for read queries
//!   consent     per-(user, application) consent and scoped disclosure
//!   subscription  28-day-month paid access for applications
//!   directory   open certifier listing, operator whitelist and fees
//!   consumer    the callback trait applications implement
//!   events      the append-only typed event log
//! ```
//!
//! Mutating operations authenticate by caller identity (the embedding
//! environment is trusted to have established it); read queries carry a
//! signed attestation instead, because reads can be invoked with an
//! arbitrary claimed caller.
//!
//! ## Key Invariants
//!
//! - At most one cert per credential type per user; order preserved.
//! - Deadlines come from the registry's injected clock, never from callers.
//! - Expired entries stay in place and are re-evaluated at comparison time.
//! - Consent commits before any callback into application code fires.

pub mod cert;
pub mod consent;
pub mod consumer;
pub mod directory;
pub mod events;
pub mod guard;
pub mod store;
pub mod subscription;

pub use cert::{Cert, CertStatus, CLAIM_LEASE_DAYS};
pub use consent::{ProfileView, UserDisclosure};
pub use consumer::ConsumerCallback;
pub use events::{EventKind, RegistryEvent};
pub use store::{
    CertifierRecord, DappRecord, DocumentBundle, Registry, RegistryConfig, UserRecord,
};
