//! # Credential Types — Single Source of Truth
//!
//! Defines the `CredentialKind` enum with the four credential types the
//! registry certifies. This is the ONE definition used across the stack.
//! Every `match` on `CredentialKind` must be exhaustive — adding a type
//! forces every consumer to handle it at compile time, including the
//! validity-vector layout pushed to consuming applications.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The credential types a certifier may attest to.
///
/// `All` is the aggregate type: a certifier attesting `All` has evaluated
/// the user against every individual regime at once. It occupies its own
/// slot in the cert sequence and the validity vector — it does not imply
/// or overwrite the individual types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Know Your Customer identity verification.
    Kyc,
    /// Anti-money-laundering screening.
    Aml,
    /// Regulation-D accredited-investor status.
    RegD,
    /// Aggregate attestation covering all regimes.
    All,
}

/// Total number of credential types. Fixed: this is the width of the
/// validity vector pushed to consuming applications.
pub const CREDENTIAL_KIND_COUNT: usize = 4;

impl CredentialKind {
    /// All credential types in validity-vector order: `[KYC, AML, REG_D, ALL]`.
    pub fn all_kinds() -> &'static [CredentialKind] {
        &[Self::Kyc, Self::Aml, Self::RegD, Self::All]
    }

    /// The slot this type occupies in the validity vector.
    pub fn vector_index(&self) -> usize {
        match self {
            Self::Kyc => 0,
            Self::Aml => 1,
            Self::RegD => 2,
            Self::All => 3,
        }
    }

    /// The snake_case string identifier for this type.
    ///
    /// Must match the serde serialization format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kyc => "kyc",
            Self::Aml => "aml",
            Self::RegD => "reg_d",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kyc" => Ok(Self::Kyc),
            "aml" => Ok(Self::Aml),
            "reg_d" => Ok(Self::RegD),
            "all" => Ok(Self::All),
            other => Err(format!("unknown credential kind: {other:?}")),
        }
    }
}

/// The 4-element boolean vector reporting live-PASS status for each
/// credential type, in [`CredentialKind::all_kinds()`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityVector(pub [bool; CREDENTIAL_KIND_COUNT]);

impl ValidityVector {
    /// A vector with no valid credentials.
    pub fn none() -> Self {
        Self([false; CREDENTIAL_KIND_COUNT])
    }

    /// Whether the given credential type is valid in this vector.
    pub fn is_valid(&self, kind: CredentialKind) -> bool {
        self.0[kind.vector_index()]
    }

    /// Set the slot for the given credential type.
    pub fn set(&mut self, kind: CredentialKind, valid: bool) {
        self.0[kind.vector_index()] = valid;
    }

    /// The raw boolean array in `[KYC, AML, REG_D, ALL]` order.
    pub fn as_array(&self) -> [bool; CREDENTIAL_KIND_COUNT] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_count() {
        assert_eq!(CredentialKind::all_kinds().len(), CREDENTIAL_KIND_COUNT);
    }

    #[test]
    fn test_all_kinds_unique() {
        let mut seen = std::collections::HashSet::new();
        for k in CredentialKind::all_kinds() {
            assert!(seen.insert(k), "Duplicate kind: {k}");
        }
    }

    #[test]
    fn test_vector_index_matches_all_kinds_order() {
        for (i, k) in CredentialKind::all_kinds().iter().enumerate() {
            assert_eq!(k.vector_index(), i);
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in CredentialKind::all_kinds() {
            let parsed: CredentialKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("nonexistent".parse::<CredentialKind>().is_err());
        assert!("KYC".parse::<CredentialKind>().is_err()); // case-sensitive
        assert!("".parse::<CredentialKind>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for kind in CredentialKind::all_kinds() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_validity_vector_set_and_read() {
        let mut v = ValidityVector::none();
        assert!(!v.is_valid(CredentialKind::All));
        v.set(CredentialKind::All, true);
        assert!(v.is_valid(CredentialKind::All));
        assert_eq!(v.as_array(), [false, false, false, true]);
    }
}
