//! # Registry Event Log
//!
//! Every state-mutating operation appends a typed event. The log is
//! append-only and ordered; collaborators that need notifications (a
//! certifier watching for new submissions, an operator auditing fee edits)
//! read it instead of polling record state.

use serde::{Deserialize, Serialize};

use vouch_core::{CredentialKind, Identity, Timestamp, ValidityVector};

/// A timestamped entry in the registry's append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// When the event was recorded (registry clock).
    pub at: Timestamp,
    /// What happened.
    pub kind: EventKind,
}

/// The registry event taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum EventKind {
    /// A user submitted documents and requests certification.
    CertificationRequested {
        /// The submitting user.
        user: Identity,
    },
    /// A certifier registered in the directory.
    CertifierRegistered {
        /// The registering certifier.
        certifier: Identity,
    },
    /// A certifier claimed a pending review.
    CertClaimed {
        /// The user under review.
        user: Identity,
        /// The claimed credential type.
        kind: CredentialKind,
        /// The claiming certifier.
        certifier: Identity,
        /// When the claim lease lapses.
        lease_expires: Timestamp,
    },
    /// A pending review was resolved as passed.
    CertPassed {
        /// The certified user.
        user: Identity,
        /// The credential type.
        kind: CredentialKind,
        /// The resolving certifier.
        certifier: Identity,
        /// Credential validity deadline.
        expires: Timestamp,
    },
    /// A pending review was resolved as failed; the cert entry was removed.
    CertFailed {
        /// The user under review.
        user: Identity,
        /// The credential type.
        kind: CredentialKind,
        /// The resolving certifier.
        certifier: Identity,
    },
    /// A user granted or revoked application consent.
    ConsentUpdated {
        /// The consenting user.
        user: Identity,
        /// The consuming application.
        dapp: Identity,
        /// The new consent flag.
        approved: bool,
    },
    /// A validity vector was pushed to an auto-whitelisting application.
    ValidityPushed {
        /// The user the vector describes.
        user: Identity,
        /// The receiving application.
        dapp: Identity,
        /// The pushed vector.
        vector: ValidityVector,
    },
    /// A consuming application registered (or re-registered).
    DappRegistered {
        /// The application.
        dapp: Identity,
        /// Months purchased.
        months: u32,
        /// Resulting subscription expiration.
        expires: Timestamp,
    },
    /// A subscription was renewed.
    SubscriptionRenewed {
        /// The application.
        dapp: Identity,
        /// Months purchased.
        months: u32,
        /// Resulting subscription expiration.
        expires: Timestamp,
    },
    /// The operator toggled a certifier's whitelist entry.
    WhitelistUpdated {
        /// The affected certifier.
        certifier: Identity,
        /// Whether the certifier may now operate.
        whitelisted: bool,
    },
    /// The operator changed a global fee parameter.
    FeesUpdated {
        /// Per-evaluation certifier compensation (informational).
        certifier_fee: u128,
        /// Per-month consuming-application subscription price.
        dapp_subscription_fee: u128,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_snake_case_tag() {
        let event = RegistryEvent {
            at: Timestamp::parse("2026-01-01T00:00:00Z").unwrap(),
            kind: EventKind::ConsentUpdated {
                user: Identity::from_bytes([1u8; 20]),
                dapp: Identity::from_bytes([2u8; 20]),
                approved: true,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["event"], "consent_updated");
        assert_eq!(json["kind"]["approved"], true);
        assert_eq!(json["kind"]["user"], "01".repeat(20));
    }

    #[test]
    fn test_event_roundtrip() {
        let event = RegistryEvent {
            at: Timestamp::parse("2026-01-01T00:00:00Z").unwrap(),
            kind: EventKind::CertClaimed {
                user: Identity::from_bytes([1u8; 20]),
                kind: CredentialKind::RegD,
                certifier: Identity::from_bytes([9u8; 20]),
                lease_expires: Timestamp::parse("2026-01-08T00:00:00Z").unwrap(),
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: RegistryEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
