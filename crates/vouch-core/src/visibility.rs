//! # Visibility Scope Tags
//!
//! Defines the `VisibilityField` enum: the set of personal-data field tags
//! a consuming application may request at registration time. Scoped
//! disclosure includes a personal field only when its tag is in the
//! application's requested set.
//!
//! `Certs` is a member of the tag set for completeness of the registration
//! wire format, but the cert sequence is never scope-filtered — only the
//! six personal fields are.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A requestable disclosure field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityField {
    /// The user's cert sequence (always disclosed regardless of scope).
    Certs,
    /// Full name.
    Name,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Passport document hash.
    Passport,
    /// Driver's license document hash.
    License,
    /// Tax return document hash.
    Taxes,
}

impl VisibilityField {
    /// The six personal fields in fixed disclosure order:
    /// name, email, phone, passport, license, taxes.
    pub fn personal_fields() -> &'static [VisibilityField] {
        &[
            Self::Name,
            Self::Email,
            Self::Phone,
            Self::Passport,
            Self::License,
            Self::Taxes,
        ]
    }

    /// The snake_case string identifier for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Certs => "certs",
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Passport => "passport",
            Self::License => "license",
            Self::Taxes => "taxes",
        }
    }
}

impl std::fmt::Display for VisibilityField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisibilityField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "certs" => Ok(Self::Certs),
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "passport" => Ok(Self::Passport),
            "license" => Ok(Self::License),
            "taxes" => Ok(Self::Taxes),
            other => Err(format!("unknown visibility field: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_fields_order_is_fixed() {
        let order: Vec<&str> = VisibilityField::personal_fields()
            .iter()
            .map(|f| f.as_str())
            .collect();
        assert_eq!(
            order,
            vec!["name", "email", "phone", "passport", "license", "taxes"]
        );
    }

    #[test]
    fn test_certs_not_in_personal_fields() {
        assert!(!VisibilityField::personal_fields().contains(&VisibilityField::Certs));
    }

    #[test]
    fn test_as_str_roundtrip() {
        for f in [
            VisibilityField::Certs,
            VisibilityField::Name,
            VisibilityField::Email,
            VisibilityField::Phone,
            VisibilityField::Passport,
            VisibilityField::License,
            VisibilityField::Taxes,
        ] {
            let parsed: VisibilityField = f.as_str().parse().unwrap();
            assert_eq!(f, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("ssn".parse::<VisibilityField>().is_err());
        assert!("NAME".parse::<VisibilityField>().is_err());
    }
}
