//! # Certification State Machine
//!
//! Each user carries an ordered cert sequence with at most one entry per
//! credential type. A cert moves through a short lifecycle:
//!
//! ```text
//!   (absent) --claim--> PENDING --pass--> PASS
//!                          |
//!                        fail
//!                          v
//!                       (absent)
//! ```
//!
//! A claim installs a PENDING cert whose expiration is a review lease:
//! the claiming certifier has exclusive resolution rights until the lease
//! lapses. Once the lease (or a PASS validity window) has expired, the
//! entry no longer blocks anything — a new claim of the same type
//! overwrites it in place. Expired entries are never garbage-collected on
//! their own; expiry is only ever evaluated at comparison time.

use serde::{Deserialize, Serialize};

use vouch_core::{CredentialKind, Identity, RegistryError, Timestamp, ValidityVector};

use crate::events::EventKind;
use crate::store::Registry;

/// Days a claiming certifier holds exclusive resolution rights.
pub const CLAIM_LEASE_DAYS: u32 = 7;

/// Lifecycle position of a cert entry.
///
/// `Uninitiated` is the notional zero state: it is reported for credential
/// types with no stored entry and never stored itself. A failed review
/// deletes the entry rather than marking it, so there is no failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertStatus {
    /// No entry exists for this credential type.
    Uninitiated,
    /// Claimed and under review; `expiration` is the claim lease deadline.
    Pending,
    /// Review passed; `expiration` is the credential validity deadline.
    Pass,
}

impl std::fmt::Display for CertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uninitiated => "uninitiated",
            Self::Pending => "pending",
            Self::Pass => "pass",
        };
        f.write_str(s)
    }
}

/// One entry in a user's cert sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cert {
    /// The credential type this entry covers.
    pub kind: CredentialKind,
    /// Lifecycle position.
    pub status: CertStatus,
    /// The certifier that claimed (and, after PASS, vouched for) the entry.
    pub certified_by: Identity,
    /// Claim-lease deadline while PENDING; validity deadline after PASS.
    pub expiration: Timestamp,
}

impl Cert {
    /// Whether this entry still blocks a new claim of the same type.
    ///
    /// Strict comparison: an entry whose expiration equals the current
    /// instant is already expired.
    pub fn is_live(&self, now: Timestamp) -> bool {
        now < self.expiration
    }

    /// Whether this entry counts as a valid credential right now.
    pub fn is_valid(&self, now: Timestamp) -> bool {
        self.status == CertStatus::Pass && self.is_live(now)
    }
}

impl Registry {
    // ── Certifier operations ─────────────────────────────────────────

    /// Claim exclusive review rights over one credential type of one user.
    ///
    /// Requires a whitelisted caller. Installs a PENDING cert with a
    /// [`CLAIM_LEASE_DAYS`]-day lease, overwriting an expired entry of the
    /// same type in place. A live entry of the same type, PENDING or PASS,
    /// blocks the claim regardless of who holds it.
    ///
    /// The user's record is created with empty defaults if absent, so a
    /// certifier may certify an identity that never submitted documents.
    pub fn claim_certification(
        &mut self,
        caller: Identity,
        user: Identity,
        kind: CredentialKind,
    ) -> Result<(), RegistryError> {
        self.require_whitelisted(caller)?;
        let now = self.now();
        let lease_expires = now.plus_days(CLAIM_LEASE_DAYS)?;

        let record = self.users_mut().entry(user).or_default();
        let claimed = Cert {
            kind,
            status: CertStatus::Pending,
            certified_by: caller,
            expiration: lease_expires,
        };
        match record.certs.iter_mut().find(|c| c.kind == kind) {
            Some(existing) if existing.is_live(now) => {
                return Err(RegistryError::ValidCertExists {
                    user,
                    certified_by: existing.certified_by,
                    kind,
                });
            }
            Some(existing) => *existing = claimed,
            None => record.certs.push(claimed),
        }

        tracing::info!(
            certifier = %caller, user = %user, kind = %kind,
            lease_expires = %lease_expires, "certification claimed",
        );
        self.record_event(EventKind::CertClaimed {
            user,
            kind,
            certifier: caller,
            lease_expires,
        });
        Ok(())
    }

    /// Resolve an owned PENDING cert as passed.
    ///
    /// Only the certifier that claimed the entry may resolve it, and only
    /// while it is still PENDING. The caller supplies the credential's
    /// validity deadline; lease expiry does not gate resolution — an
    /// unexpired competing claim would have blocked re-claiming instead.
    pub fn certify_pass(
        &mut self,
        caller: Identity,
        user: Identity,
        kind: CredentialKind,
        expiration: Timestamp,
    ) -> Result<(), RegistryError> {
        self.require_whitelisted(caller)?;
        let cert = self
            .users_mut()
            .get_mut(&user)
            .and_then(|r| r.certs.iter_mut().find(|c| c.kind == kind))
            .filter(|c| c.status == CertStatus::Pending && c.certified_by == caller)
            .ok_or(RegistryError::PendingCertMissing { user, kind })?;

        cert.status = CertStatus::Pass;
        cert.expiration = expiration;

        tracing::info!(
            certifier = %caller, user = %user, kind = %kind,
            expires = %expiration, "certification passed",
        );
        self.record_event(EventKind::CertPassed {
            user,
            kind,
            certifier: caller,
            expires: expiration,
        });
        Ok(())
    }

    /// Resolve an owned PENDING cert as failed, deleting the entry.
    ///
    /// The remaining sequence keeps its order. After failure the type is
    /// immediately claimable again, by this certifier or any other.
    pub fn certify_fail(
        &mut self,
        caller: Identity,
        user: Identity,
        kind: CredentialKind,
    ) -> Result<(), RegistryError> {
        self.require_whitelisted(caller)?;
        let record = self
            .users_mut()
            .get_mut(&user)
            .ok_or(RegistryError::PendingCertMissing { user, kind })?;
        let pos = record
            .certs
            .iter()
            .position(|c| {
                c.kind == kind && c.status == CertStatus::Pending && c.certified_by == caller
            })
            .ok_or(RegistryError::PendingCertMissing { user, kind })?;
        record.certs.remove(pos);

        tracing::info!(certifier = %caller, user = %user, kind = %kind, "certification failed");
        self.record_event(EventKind::CertFailed {
            user,
            kind,
            certifier: caller,
        });
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Lifecycle position of one credential type for one user.
    ///
    /// Reports `Uninitiated` when the user or the entry is absent. Note
    /// that an expired entry still reports its stored status; use
    /// [`Registry::validity_vector`] for liveness.
    pub fn cert_status(&self, user: &Identity, kind: CredentialKind) -> CertStatus {
        self.user(user)
            .and_then(|r| r.certs.iter().find(|c| c.kind == kind))
            .map(|c| c.status)
            .unwrap_or(CertStatus::Uninitiated)
    }

    /// The user's current validity vector, in `[KYC, AML, REG_D, ALL]` order.
    ///
    /// A slot is true iff an entry of that type is present, has PASS
    /// status, and its expiration is strictly in the future. Unknown users
    /// yield the all-false vector.
    pub fn validity_vector(&self, user: &Identity) -> ValidityVector {
        let now = self.now();
        let mut vector = ValidityVector::none();
        if let Some(record) = self.user(user) {
            for cert in &record.certs {
                if cert.is_valid(now) {
                    vector.set(cert.kind, true);
                }
            }
        }
        vector
    }

    pub(crate) fn require_whitelisted(&self, caller: Identity) -> Result<(), RegistryError> {
        if self.is_whitelisted(&caller) {
            Ok(())
        } else {
            Err(RegistryError::NotWhitelisted { certifier: caller })
        }
    }
}
