//! # Recoverable ECDSA (secp256k1)
//!
//! Signing and signer-identity recovery for query attestations. The guard
//! cannot trust the caller context of a read-only query, so the only
//! believable proof of who is asking is a signature from which the signer's
//! identity can be *recovered* and compared.
//!
//! ## Security Notes
//!
//! - **Malleability prevention**: high-S signatures are rejected on
//!   recovery; the signing path normalizes S to the low half and flips the
//!   recovery id accordingly.
//! - **Recovery id**: accepted `v` values are 0, 1, 27, 28.
//! - Private keys are never serialized or logged. `SigningKeyPair` does not
//!   implement `Serialize` and its `Debug` output is redacted.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use vouch_core::{CryptoError, Identity};

/// A recoverable ECDSA signature: `r`, `s`, and the recovery id `v`.
///
/// Serializes as a 130-character hex string (`r || s || v`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// The 32-byte `r` component.
    pub r: [u8; 32],
    /// The 32-byte `s` component (low half of the curve order).
    pub s: [u8; 32],
    /// Recovery id: 0, 1, 27, or 28.
    pub v: u8,
}

impl RecoverableSignature {
    /// Render as a lowercase hex string (`r || s || v`, 130 chars).
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(130);
        for b in self.r.iter().chain(self.s.iter()) {
            out.push_str(&format!("{b:02x}"));
        }
        out.push_str(&format!("{:02x}", self.v));
        out
    }

    /// Parse from a 130-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let hex = hex.trim().to_lowercase();
        if hex.len() != 130 {
            return Err(CryptoError::MalformedSignature(format!(
                "signature hex must be 130 chars, got {}",
                hex.len()
            )));
        }
        let bytes = hex_to_bytes(&hex).map_err(CryptoError::MalformedSignature)?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.r.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "RecoverableSignature({prefix}..., v={})", self.v)
    }
}

// ─── Recovery ────────────────────────────────────────────────────────

/// Recover the signer's identity from a message hash and signature.
///
/// Rejects high-S signatures and invalid recovery ids. The returned
/// identity is the address derived from the recovered public key; callers
/// must compare it against whatever identity the operation claims.
pub fn recover_signer(
    message_hash: &[u8; 32],
    signature: &RecoverableSignature,
) -> Result<Identity, CryptoError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes)
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;

    // A normalizable signature has S in the high half of the curve order.
    if sig.normalize_s().is_some() {
        return Err(CryptoError::MalformedSignature(
            "high-S signature rejected (malleable)".to_string(),
        ));
    }

    let recovered = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|e| CryptoError::VerificationFailed(format!("recovery failed: {e}")))?;

    Ok(identity_from_verifying_key(&recovered))
}

/// Recover the signer and check it matches the expected identity.
pub fn verify_signer(
    message_hash: &[u8; 32],
    signature: &RecoverableSignature,
    expected: &Identity,
) -> Result<(), CryptoError> {
    let recovered = recover_signer(message_hash, signature)?;
    if recovered != *expected {
        return Err(CryptoError::VerificationFailed(format!(
            "recovered signer {recovered} does not match expected {expected}"
        )));
    }
    Ok(())
}

/// Derive a registry identity from a secp256k1 public key.
///
/// SHA-256 over the uncompressed point bytes (minus the 0x04 prefix),
/// taking the last 20 bytes.
pub fn identity_from_verifying_key(key: &VerifyingKey) -> Identity {
    let point = key.to_encoded_point(false);
    let digest = Sha256::digest(&point.as_bytes()[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest[12..]);
    Identity::from_bytes(addr)
}

/// Parse a recovery id from a `v` byte. Valid values: 0, 1, 27, 28.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    let id = match v {
        0 | 27 => 0u8,
        1 | 28 => 1u8,
        _ => return Err(CryptoError::InvalidRecoveryId(v)),
    };
    RecoveryId::try_from(id).map_err(|_| CryptoError::InvalidRecoveryId(v))
}

// ─── Key pairs ───────────────────────────────────────────────────────

/// A secp256k1 key pair for producing query attestations.
///
/// Does not implement `Serialize` — private keys must not be accidentally
/// serialized into logs, responses, or artifacts.
pub struct SigningKeyPair {
    signing_key: SigningKey,
}

impl SigningKeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create a key pair from a raw 32-byte private scalar.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_bytes(seed.into())
            .map_err(|e| CryptoError::KeyError(format!("invalid private scalar: {e}")))?;
        Ok(Self { signing_key })
    }

    /// The registry identity of this key pair.
    pub fn identity(&self) -> Identity {
        identity_from_verifying_key(self.signing_key.verifying_key())
    }

    /// Expose the private scalar as hex, for key export by the CLI only.
    pub fn secret_hex(&self) -> String {
        self.signing_key
            .to_bytes()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Sign a 32-byte message hash, producing a recoverable signature with
    /// S normalized to the low half of the curve order.
    pub fn sign_prehash(&self, message_hash: &[u8; 32]) -> Result<RecoverableSignature, CryptoError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(message_hash)
            .map_err(|e| CryptoError::VerificationFailed(format!("signing failed: {e}")))?;

        // Normalize S; a flipped S flips the recovered point's parity.
        let (sig, recid) = match sig.normalize_s() {
            Some(normalized) => {
                let flipped = RecoveryId::try_from(recid.to_byte() ^ 1)
                    .map_err(|_| CryptoError::InvalidRecoveryId(recid.to_byte()))?;
                (normalized, flipped)
            }
            None => (sig, recid),
        };

        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(RecoverableSignature {
            r,
            s,
            v: recid.to_byte(),
        })
    }
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKeyPair(<private>)")
    }
}

fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("hex string must have even length".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(msg: &[u8]) -> [u8; 32] {
        Sha256::digest(msg).into()
    }

    #[test]
    fn test_sign_and_recover_roundtrip() {
        let kp = SigningKeyPair::generate();
        let h = hash(b"who is asking");
        let sig = kp.sign_prehash(&h).unwrap();
        let recovered = recover_signer(&h, &sig).unwrap();
        assert_eq!(recovered, kp.identity());
    }

    #[test]
    fn test_recover_wrong_message_yields_different_identity() {
        let kp = SigningKeyPair::generate();
        let sig = kp.sign_prehash(&hash(b"original")).unwrap();
        // Recovery over a different hash succeeds but yields some other key.
        if let Ok(recovered) = recover_signer(&hash(b"tampered"), &sig) {
            assert_ne!(recovered, kp.identity());
        }
    }

    #[test]
    fn test_verify_signer_matches() {
        let kp = SigningKeyPair::generate();
        let h = hash(b"attestation");
        let sig = kp.sign_prehash(&h).unwrap();
        verify_signer(&h, &sig, &kp.identity()).unwrap();
    }

    #[test]
    fn test_verify_signer_mismatch_fails() {
        let kp = SigningKeyPair::generate();
        let other = SigningKeyPair::generate();
        let h = hash(b"attestation");
        let sig = kp.sign_prehash(&h).unwrap();
        assert!(verify_signer(&h, &sig, &other.identity()).is_err());
    }

    #[test]
    fn test_invalid_recovery_id_rejected() {
        let kp = SigningKeyPair::generate();
        let h = hash(b"msg");
        let mut sig = kp.sign_prehash(&h).unwrap();
        sig.v = 5;
        assert!(matches!(
            recover_signer(&h, &sig),
            Err(CryptoError::InvalidRecoveryId(5))
        ));
    }

    #[test]
    fn test_v_27_28_accepted() {
        let kp = SigningKeyPair::generate();
        let h = hash(b"msg");
        let mut sig = kp.sign_prehash(&h).unwrap();
        sig.v += 27;
        let recovered = recover_signer(&h, &sig).unwrap();
        assert_eq!(recovered, kp.identity());
    }

    #[test]
    fn test_garbage_signature_rejected() {
        let h = hash(b"msg");
        let sig = RecoverableSignature {
            r: [0xFF; 32],
            s: [0xFF; 32],
            v: 27,
        };
        assert!(recover_signer(&h, &sig).is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let kp = SigningKeyPair::generate();
        let sig = kp.sign_prehash(&hash(b"x")).unwrap();
        let hex = sig.to_hex();
        assert_eq!(hex.len(), 130);
        let parsed = RecoverableSignature::from_hex(&hex).unwrap();
        assert_eq!(sig, parsed);
    }

    #[test]
    fn test_serde_roundtrip() {
        let kp = SigningKeyPair::generate();
        let sig = kp.sign_prehash(&hash(b"y")).unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        let parsed: RecoverableSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, parsed);
    }

    #[test]
    fn test_deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = SigningKeyPair::from_seed(&seed).unwrap();
        let kp2 = SigningKeyPair::from_seed(&seed).unwrap();
        assert_eq!(kp1.identity(), kp2.identity());
        let h = hash(b"deterministic");
        assert_eq!(kp1.sign_prehash(&h).unwrap(), kp2.sign_prehash(&h).unwrap());
    }

    #[test]
    fn test_zero_seed_rejected() {
        assert!(SigningKeyPair::from_seed(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_private_key() {
        let kp = SigningKeyPair::generate();
        assert_eq!(format!("{kp:?}"), "SigningKeyPair(<private>)");
    }

    #[test]
    fn test_identity_is_stable_across_signatures() {
        let kp = SigningKeyPair::generate();
        for i in 0..5 {
            let h = hash(format!("message {i}").as_bytes());
            let sig = kp.sign_prehash(&h).unwrap();
            assert_eq!(recover_signer(&h, &sig).unwrap(), kp.identity());
        }
    }
}
