//! # Registry Store
//!
//! The persistent keyed state of the registry: one `UserRecord` per
//! identity, one `CertifierRecord` per registered certifier, one
//! `DappRecord` per consuming application, the certifier whitelist, the
//! consent relation, the two global fee parameters, and the event log.
//!
//! The registry is a single strongly-serialized state machine: every
//! mutating operation takes `&mut self` and either completes in full or
//! returns an error having changed nothing.
//!
//! ## Consent relation
//!
//! Consent flags live in a relation keyed by `(user, application)` rather
//! than inside the owning `UserRecord`, so enumerating or cloning a user
//! record never aliases consent state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use vouch_core::{Clock, Identity, SystemClock, Timestamp, VisibilityField};

use crate::cert::Cert;
use crate::events::{EventKind, RegistryEvent};

/// A user's stored record.
///
/// Created implicitly with empty defaults the first time an identity
/// submits documents; never destroyed. The six document fields and the
/// encryption key are opaque references to externally encrypted material —
/// the registry stores and discloses them, never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Ordered cert sequence; at most one entry per credential type.
    pub certs: Vec<Cert>,
    /// Full name (opaque reference).
    pub name: String,
    /// Email address (opaque reference).
    pub email: String,
    /// Phone number (opaque reference).
    pub phone: String,
    /// Passport document hash.
    pub passport_hash: String,
    /// Driver's license document hash.
    pub drivers_license_hash: String,
    /// Tax return document hash.
    pub tax_return_hash: String,
    /// Key string mediating out-of-band decryption of the above.
    pub encryption_key: String,
}

/// The documents a user submits for certification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBundle {
    /// Full name (opaque reference).
    pub name: String,
    /// Email address (opaque reference).
    pub email: String,
    /// Phone number (opaque reference).
    pub phone: String,
    /// Passport document hash.
    pub passport_hash: String,
    /// Driver's license document hash.
    pub drivers_license_hash: String,
    /// Tax return document hash.
    pub tax_return_hash: String,
    /// Key string mediating out-of-band decryption.
    pub encryption_key: String,
}

/// A registered certifier's attestation metadata.
///
/// Free-form and unverified; registration is open to any identity and does
/// not imply whitelisting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertifierRecord {
    /// The certifier's website.
    pub website: String,
    /// The certifier's tax identifier.
    pub tax_id: String,
}

/// A consuming application's registration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DappRecord {
    /// The admin identity bound at registration. Authorization for
    /// application queries compares against this stored value, never
    /// against a caller-supplied object.
    pub admin: Identity,
    /// Whether consent grants trigger an immediate validity push.
    pub auto_whitelist: bool,
    /// When the paid subscription lapses. The registry records this;
    /// enforcing it against stale applications is the collaborator's job.
    pub subscription_expiration: Timestamp,
    /// The personal-field tags this application requested to see.
    pub visibility_requests: HashSet<VisibilityField>,
}

/// Construction parameters for a registry instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The operator identity: may edit the whitelist and fee parameters.
    pub operator: Identity,
    /// Intended per-evaluation certifier compensation (accounting only).
    pub certifier_fee: u128,
    /// Per-month price charged to consuming applications.
    pub dapp_subscription_fee: u128,
}

/// The credential registry.
///
/// All mutating operations are atomic with respect to each other; the one
/// externally-visible callback (the auto-whitelist push) fires only after
/// the operation's own state is committed.
pub struct Registry {
    operator: Identity,
    clock: Arc<dyn Clock>,
    users: HashMap<Identity, UserRecord>,
    certifiers: HashMap<Identity, CertifierRecord>,
    whitelist: HashSet<Identity>,
    dapps: HashMap<Identity, DappRecord>,
    consents: HashMap<(Identity, Identity), bool>,
    certifier_fee: u128,
    dapp_subscription_fee: u128,
    collected_fees: u128,
    events: Vec<RegistryEvent>,
}

impl Registry {
    /// Create a registry reading time from the system clock.
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a registry reading time from the given clock.
    ///
    /// Lease deadlines and subscription expirations are computed only from
    /// this clock, never from caller-supplied values.
    pub fn with_clock(config: RegistryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            operator: config.operator,
            clock,
            users: HashMap::new(),
            certifiers: HashMap::new(),
            whitelist: HashSet::new(),
            dapps: HashMap::new(),
            consents: HashMap::new(),
            certifier_fee: config.certifier_fee,
            dapp_subscription_fee: config.dapp_subscription_fee,
            collected_fees: 0,
            events: Vec::new(),
        }
    }

    // ── User operations ──────────────────────────────────────────────

    /// Store a user's documents and request certification.
    ///
    /// The caller is the subject: documents land in the caller's own
    /// record, created with empty defaults if this identity has never
    /// submitted before. Existing certs are untouched.
    pub fn submit_documents(&mut self, caller: Identity, bundle: DocumentBundle) {
        let record = self.users.entry(caller).or_default();
        record.name = bundle.name;
        record.email = bundle.email;
        record.phone = bundle.phone;
        record.passport_hash = bundle.passport_hash;
        record.drivers_license_hash = bundle.drivers_license_hash;
        record.tax_return_hash = bundle.tax_return_hash;
        record.encryption_key = bundle.encryption_key;

        tracing::info!(user = %caller, "documents submitted, certification requested");
        self.record_event(EventKind::CertificationRequested { user: caller });
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The registry operator.
    pub fn operator(&self) -> Identity {
        self.operator
    }

    /// A user's record, if the identity has ever submitted or been certified.
    pub fn user(&self, id: &Identity) -> Option<&UserRecord> {
        self.users.get(id)
    }

    /// A certifier's directory entry.
    pub fn certifier(&self, id: &Identity) -> Option<&CertifierRecord> {
        self.certifiers.get(id)
    }

    /// A consuming application's registration record.
    pub fn dapp(&self, id: &Identity) -> Option<&DappRecord> {
        self.dapps.get(id)
    }

    /// Whether a certifier may currently operate the state machine.
    pub fn is_whitelisted(&self, id: &Identity) -> bool {
        self.whitelist.contains(id)
    }

    /// Intended per-evaluation certifier compensation.
    pub fn certifier_fee(&self) -> u128 {
        self.certifier_fee
    }

    /// Per-month consuming-application subscription price.
    pub fn dapp_subscription_fee(&self) -> u128 {
        self.dapp_subscription_fee
    }

    /// Total fee value collected into custody. No withdrawal path exists.
    pub fn collected_fees(&self) -> u128 {
        self.collected_fees
    }

    /// The append-only event log, oldest first.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    // ── Internal ─────────────────────────────────────────────────────

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub(crate) fn record_event(&mut self, kind: EventKind) {
        self.events.push(RegistryEvent {
            at: self.clock.now(),
            kind,
        });
    }

    pub(crate) fn users_mut(&mut self) -> &mut HashMap<Identity, UserRecord> {
        &mut self.users
    }

    pub(crate) fn certifiers_mut(&mut self) -> &mut HashMap<Identity, CertifierRecord> {
        &mut self.certifiers
    }

    pub(crate) fn whitelist_mut(&mut self) -> &mut HashSet<Identity> {
        &mut self.whitelist
    }

    pub(crate) fn dapps_mut(&mut self) -> &mut HashMap<Identity, DappRecord> {
        &mut self.dapps
    }

    pub(crate) fn consents(&self) -> &HashMap<(Identity, Identity), bool> {
        &self.consents
    }

    pub(crate) fn consents_mut(&mut self) -> &mut HashMap<(Identity, Identity), bool> {
        &mut self.consents
    }

    pub(crate) fn set_fees(&mut self, certifier_fee: u128, dapp_subscription_fee: u128) {
        self.certifier_fee = certifier_fee;
        self.dapp_subscription_fee = dapp_subscription_fee;
    }

    pub(crate) fn collect(&mut self, amount: u128) {
        self.collected_fees = self.collected_fees.saturating_add(amount);
    }
}
