//! # Identity Newtype
//!
//! A 20-byte address derived from a signer's public key. Users, certifiers,
//! consuming applications, and the registry operator all live in this one
//! address space — what distinguishes them is which registry tables they
//! appear in, never the shape of the identifier.
//!
//! ## Security Invariant
//!
//! An `Identity` is only meaningful when it was produced by key derivation
//! or recovered from a signature. The registry compares identities for
//! equality; it never derives trust from the caller-supplied value alone.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 20-byte registry address.
///
/// Serializes as a lowercase hex string (40 chars) for JSON interoperability.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub [u8; 20]);

impl Identity {
    /// Create an identity from raw 20 bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Return the raw 20-byte address.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Render the address as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse an address from a 40-character hex string.
    ///
    /// A `0x` prefix is accepted and stripped.
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let hex = hex.trim().trim_start_matches("0x").to_lowercase();
        if hex.len() != 40 {
            return Err(format!("identity hex must be 40 chars, got {}", hex.len()));
        }
        let bytes = hex_to_bytes(&hex)?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Identity(0x{})", self.to_hex())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

pub(crate) fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, String> {
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
