//! # Consumer Callback Interface
//!
//! The contract every consuming application must expose to the registry:
//! report who administers it, and accept a push of a user's
//! credential-validity vector for auto-whitelisting.
//!
//! The registry never stores callbacks. Operations that need the
//! collaborator take it as a parameter, so the binding between an
//! application identity and its callback object stays with the caller.

use vouch_core::{Identity, ValidityVector};

/// Capability a consuming application exposes to the registry.
pub trait ConsumerCallback {
    /// The identity authorized to administer this application.
    ///
    /// Pure query; the registry calls it to authorize registration and
    /// application-admin data queries.
    fn admin_identity(&self) -> Identity;

    /// Accept a push of a user's credential-validity vector.
    ///
    /// Fire-and-forget from the registry's perspective: no return value is
    /// consulted, and a misbehaving implementation cannot roll back the
    /// consent grant that triggered the push.
    fn push_validity(&self, user: &Identity, vector: ValidityVector);
}
