//! # Query Attestations
//!
//! Read-only registry queries can be invoked with an arbitrary claimed
//! caller identity, so each one carries a signed attestation: a signature
//! over a domain-separated digest that binds the query purpose and the
//! record being queried. The guard recovers the signer from the digest and
//! compares it against the policy for that query.
//!
//! The digest does not bind a nonce or expiry; message construction is
//! centralized here so freshness binding can be added in one place.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use vouch_core::Identity;

use crate::ecdsa::RecoverableSignature;

/// Domain-separation prefix for all query attestation digests.
const ATTESTATION_DOMAIN: &[u8] = b"vouch/attestation/v1";

/// The query a signed attestation authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPurpose {
    /// Self-or-certifier view of a user's full record.
    UserData,
    /// Application admin's view of its own registration record.
    DappData,
    /// Application admin's consent-scoped review of a user.
    UserReview,
}

impl QueryPurpose {
    /// Stable wire tag mixed into the attestation digest.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserData => "user_data",
            Self::DappData => "dapp_data",
            Self::UserReview => "user_review",
        }
    }
}

/// Compute the attestation digest for a query.
///
/// `subject` is the record being queried: the user identity for
/// [`QueryPurpose::UserData`] and [`QueryPurpose::UserReview`], the
/// application identity for [`QueryPurpose::DappData`].
pub fn attestation_digest(purpose: QueryPurpose, subject: &Identity) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(ATTESTATION_DOMAIN);
    hasher.update([0u8]);
    hasher.update(purpose.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(subject.as_bytes());
    hasher.finalize().into()
}

/// A signed query attestation: the message digest and a recoverable
/// signature over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAttestation {
    /// The 32-byte attestation digest that was signed.
    pub message_hash: [u8; 32],
    /// The recoverable signature over `message_hash`.
    pub signature: RecoverableSignature,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecdsa::{recover_signer, SigningKeyPair};

    #[test]
    fn test_digest_is_deterministic() {
        let subject = Identity::from_bytes([3u8; 20]);
        let a = attestation_digest(QueryPurpose::UserData, &subject);
        let b = attestation_digest(QueryPurpose::UserData, &subject);
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_separates_purposes() {
        let subject = Identity::from_bytes([3u8; 20]);
        let a = attestation_digest(QueryPurpose::UserData, &subject);
        let b = attestation_digest(QueryPurpose::UserReview, &subject);
        assert_ne!(a, b);
    }

    #[test]
    fn test_digest_separates_subjects() {
        let a = attestation_digest(QueryPurpose::DappData, &Identity::from_bytes([1u8; 20]));
        let b = attestation_digest(QueryPurpose::DappData, &Identity::from_bytes([2u8; 20]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_signed_attestation_recovers_signer() {
        let kp = SigningKeyPair::generate();
        let subject = Identity::from_bytes([9u8; 20]);
        let digest = attestation_digest(QueryPurpose::UserReview, &subject);
        let att = SignedAttestation {
            message_hash: digest,
            signature: kp.sign_prehash(&digest).unwrap(),
        };
        assert_eq!(
            recover_signer(&att.message_hash, &att.signature).unwrap(),
            kp.identity()
        );
    }
}
