//! # Authorization Guard
//!
//! Read-only queries carry a claimed caller identity that the registry has
//! no execution context to verify, so each one also carries a signed
//! attestation. The guard recomputes the expected attestation digest for
//! the query, recovers the signer from the signature, and applies the
//! policy for that query.
//!
//! All guard failures collapse to [`RegistryError::Unauthorized`]: a caller
//! probing the guard learns that the proof failed, never which check broke.

use vouch_core::{Identity, RegistryError};
use vouch_crypto::{attestation_digest, recover_signer, QueryPurpose, SignedAttestation};

use crate::store::Registry;

impl Registry {
    /// Authorize a query a user may make about themselves, or a
    /// whitelisted certifier may make about anyone.
    ///
    /// The attestation must cover exactly this purpose and subject, the
    /// recovered signer must be the claimed caller, and the signer must be
    /// either the subject or a currently whitelisted certifier.
    pub(crate) fn authorize_self_or_certifier(
        &self,
        caller: Identity,
        subject: Identity,
        purpose: QueryPurpose,
        attestation: &SignedAttestation,
    ) -> Result<(), RegistryError> {
        let signer = self.recovered_signer(purpose, subject, attestation)?;
        if signer != caller {
            return Err(RegistryError::Unauthorized);
        }
        if signer == subject || self.is_whitelisted(&signer) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized)
        }
    }

    /// Authorize a query only an application's registered admin may make.
    ///
    /// The admin identity is the one stored in the application's record at
    /// registration time. Anything the caller supplies per-call — including
    /// a callback object claiming to speak for the application — is
    /// untrusted input, exactly like the claimed caller identity itself.
    pub(crate) fn authorize_dapp_admin(
        &self,
        caller: Identity,
        dapp: Identity,
        subject: Identity,
        purpose: QueryPurpose,
        attestation: &SignedAttestation,
    ) -> Result<(), RegistryError> {
        let admin = self
            .dapp(&dapp)
            .map(|record| record.admin)
            .ok_or(RegistryError::Unauthorized)?;
        let signer = self.recovered_signer(purpose, subject, attestation)?;
        if signer != caller || signer != admin {
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }

    /// Check the attestation covers this purpose and subject, then recover
    /// its signer.
    fn recovered_signer(
        &self,
        purpose: QueryPurpose,
        subject: Identity,
        attestation: &SignedAttestation,
    ) -> Result<Identity, RegistryError> {
        let expected = attestation_digest(purpose, &subject);
        if attestation.message_hash != expected {
            return Err(RegistryError::Unauthorized);
        }
        recover_signer(&attestation.message_hash, &attestation.signature)
            .map_err(|_| RegistryError::Unauthorized)
    }
}
