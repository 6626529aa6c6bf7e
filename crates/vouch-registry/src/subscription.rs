//! # Subscription Ledger
//!
//! Consuming applications pay for access in 28-day months at the global
//! per-month price. Payment is exact-amount: anything other than
//! `months * fee` is rejected outright rather than partially credited or
//! refunded. Collected value accumulates in registry custody; no
//! withdrawal path exists.

use std::collections::HashSet;

use vouch_core::{Identity, RegistryError, VisibilityField};
use vouch_crypto::{QueryPurpose, SignedAttestation};

use crate::consumer::ConsumerCallback;
use crate::events::EventKind;
use crate::store::{DappRecord, Registry};

impl Registry {
    /// Register (or re-register) a consuming application.
    ///
    /// Only the application's declared admin may register it; the claim is
    /// checked against `collaborator.admin_identity()` rather than a
    /// signature because registration is the call that first binds the
    /// application to the registry. That admin identity is persisted in
    /// the record, and every later application-admin query authorizes
    /// against the stored value. Payment must be exactly
    /// `months * dapp_subscription_fee` for at least one month.
    /// Re-registration overwrites the record wholesale, including the
    /// admin and the visibility requests, and restarts the subscription
    /// from now.
    pub fn register_dapp(
        &mut self,
        caller: Identity,
        dapp: Identity,
        months: u32,
        payment: u128,
        auto_whitelist: bool,
        visibility_requests: HashSet<VisibilityField>,
        collaborator: &dyn ConsumerCallback,
    ) -> Result<(), RegistryError> {
        if caller != collaborator.admin_identity() {
            return Err(RegistryError::NotPermitted {
                reason: "caller is not the application's declared admin".to_string(),
            });
        }
        self.charge_subscription(months, payment)?;
        let expires = self.now().plus_months_28(months)?;

        self.dapps_mut().insert(
            dapp,
            DappRecord {
                admin: caller,
                auto_whitelist,
                subscription_expiration: expires,
                visibility_requests,
            },
        );
        self.collect(payment);

        tracing::info!(dapp = %dapp, months, expires = %expires, "application registered");
        self.record_event(EventKind::DappRegistered {
            dapp,
            months,
            expires,
        });
        Ok(())
    }

    /// Extend an existing subscription.
    ///
    /// Open to any caller — the registry happily accepts a third party
    /// paying for someone else's access, since renewal changes nothing but
    /// the expiration. The new expiration is `months` added to whichever is
    /// later: the current expiration or now. Renewing early never loses
    /// paid time; renewing after a lapse never backfills the gap.
    pub fn renew_subscription(
        &mut self,
        caller: Identity,
        dapp: Identity,
        months: u32,
        payment: u128,
    ) -> Result<(), RegistryError> {
        let current = self
            .dapp(&dapp)
            .ok_or_else(|| RegistryError::NotPermitted {
                reason: "application is not registered".to_string(),
            })?
            .subscription_expiration;
        self.charge_subscription(months, payment)?;

        let base = current.max(self.now());
        let expires = base.plus_months_28(months)?;
        if let Some(record) = self.dapps_mut().get_mut(&dapp) {
            record.subscription_expiration = expires;
        }
        self.collect(payment);

        tracing::info!(payer = %caller, dapp = %dapp, months, expires = %expires, "subscription renewed");
        self.record_event(EventKind::SubscriptionRenewed {
            dapp,
            months,
            expires,
        });
        Ok(())
    }

    /// An application admin's view of its own registration record.
    ///
    /// Authorized by signature against the admin stored at registration.
    pub fn view_dapp(
        &self,
        caller: Identity,
        dapp: Identity,
        attestation: &SignedAttestation,
    ) -> Result<DappRecord, RegistryError> {
        self.authorize_dapp_admin(caller, dapp, dapp, QueryPurpose::DappData, attestation)?;
        self.dapp(&dapp)
            .cloned()
            .ok_or_else(|| RegistryError::NotPermitted {
                reason: "application is not registered".to_string(),
            })
    }

    fn charge_subscription(&self, months: u32, payment: u128) -> Result<(), RegistryError> {
        // A zero-month purchase would be free and still overwrite the
        // record; it buys nothing, so it is not a purchase at all.
        if months == 0 {
            return Err(RegistryError::NotPermitted {
                reason: "subscription must cover at least one month".to_string(),
            });
        }
        let expected = self
            .dapp_subscription_fee()
            .saturating_mul(u128::from(months));
        if payment != expected {
            return Err(RegistryError::PaymentMismatch {
                expected,
                attached: payment,
            });
        }
        Ok(())
    }
}
