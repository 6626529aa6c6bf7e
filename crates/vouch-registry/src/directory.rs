//! # Certifier Directory and Operator Controls
//!
//! Registration in the directory is open: any identity may list a website
//! and tax id. Operating the certification state machine is not —
//! certifiers must additionally be whitelisted by the operator, and the
//! two are independent: an identity can be whitelisted without a directory
//! entry, or listed without being whitelisted.
//!
//! Removing a certifier from the whitelist strips its ability to claim and
//! resolve going forward, but leaves its in-flight claims and issued PASS
//! certs untouched; leases it can no longer act on simply lapse.

use vouch_core::{Identity, RegistryError};

use crate::events::EventKind;
use crate::store::{CertifierRecord, Registry};

impl Registry {
    /// List the caller in the certifier directory.
    ///
    /// Open to any identity; re-registration overwrites the entry. Listing
    /// carries no privileges — only the operator-managed whitelist does.
    pub fn register_certifier(&mut self, caller: Identity, website: String, tax_id: String) {
        self.certifiers_mut()
            .insert(caller, CertifierRecord { website, tax_id });
        tracing::info!(certifier = %caller, "certifier registered");
        self.record_event(EventKind::CertifierRegistered { certifier: caller });
    }

    /// Add or remove a certifier from the whitelist. Operator only.
    pub fn set_certifier_whitelist(
        &mut self,
        caller: Identity,
        certifier: Identity,
        whitelisted: bool,
    ) -> Result<(), RegistryError> {
        self.require_operator(caller)?;
        if whitelisted {
            self.whitelist_mut().insert(certifier);
        } else {
            self.whitelist_mut().remove(&certifier);
        }
        tracing::info!(certifier = %certifier, whitelisted, "whitelist updated");
        self.record_event(EventKind::WhitelistUpdated {
            certifier,
            whitelisted,
        });
        Ok(())
    }

    /// Update the global fee parameters. Operator only.
    ///
    /// Takes effect immediately: the new subscription price applies to the
    /// next registration or renewal, and never retroactively reprices paid
    /// time.
    pub fn update_fees(
        &mut self,
        caller: Identity,
        certifier_fee: u128,
        dapp_subscription_fee: u128,
    ) -> Result<(), RegistryError> {
        self.require_operator(caller)?;
        self.set_fees(certifier_fee, dapp_subscription_fee);
        tracing::info!(certifier_fee, dapp_subscription_fee, "fees updated");
        self.record_event(EventKind::FeesUpdated {
            certifier_fee,
            dapp_subscription_fee,
        });
        Ok(())
    }

    fn require_operator(&self, caller: Identity) -> Result<(), RegistryError> {
        if caller == self.operator() {
            Ok(())
        } else {
            Err(RegistryError::NotPermitted {
                reason: "caller is not the registry operator".to_string(),
            })
        }
    }
}
