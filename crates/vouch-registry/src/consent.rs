//! # Consent and Scoped Disclosure
//!
//! A user's personal data leaves the registry on exactly two paths: the
//! self-or-certifier full view, and the consent-scoped review an
//! application admin may run. Consent is a per-`(user, application)` flag
//! the user toggles at will; revocation takes effect on the next query.
//!
//! ## Callback ordering
//!
//! Granting consent to an auto-whitelisting application triggers a validity
//! push into the application's own code. The consent flag is committed
//! *before* the push fires, so an application that re-enters the registry
//! from inside `push_validity` observes the grant already in place and
//! cannot be replayed into a half-applied state.

use serde::{Deserialize, Serialize};

use vouch_core::{Identity, RegistryError, VisibilityField};
use vouch_crypto::{QueryPurpose, SignedAttestation};

use crate::cert::Cert;
use crate::consumer::ConsumerCallback;
use crate::events::EventKind;
use crate::store::Registry;

/// The full view of a user's record, returned to the user themselves or to
/// a whitelisted certifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    /// The user's cert sequence, expired entries included.
    pub certs: Vec<Cert>,
    /// Full name (opaque reference).
    pub name: String,
    /// Email address (opaque reference).
    pub email: String,
    /// Phone number (opaque reference).
    pub phone: String,
    /// Passport document hash.
    pub passport_hash: String,
    /// Driver's license document hash.
    pub drivers_license_hash: String,
    /// Tax return document hash.
    pub tax_return_hash: String,
    /// Key string mediating out-of-band decryption.
    pub encryption_key: String,
}

/// The consent-scoped view of a user disclosed to an application admin.
///
/// The cert sequence is always included; each of the six personal fields
/// is included only if the application requested that field at
/// registration, and is the empty string otherwise. Field positions are
/// fixed, so an application cannot infer anything from layout. The
/// encryption key is never part of this view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDisclosure {
    /// The user's cert sequence, expired entries included.
    pub certs: Vec<Cert>,
    /// Full name, if requested.
    pub name: String,
    /// Email address, if requested.
    pub email: String,
    /// Phone number, if requested.
    pub phone: String,
    /// Passport document hash, if requested.
    pub passport_hash: String,
    /// Driver's license document hash, if requested.
    pub drivers_license_hash: String,
    /// Tax return document hash, if requested.
    pub tax_return_hash: String,
}

impl Registry {
    // ── Consent ──────────────────────────────────────────────────────

    /// Grant or revoke the caller's consent toward one application.
    ///
    /// Callable regardless of whether the application is registered, so a
    /// user can pre-approve or pre-emptively revoke. When the grant lands
    /// on a registered auto-whitelisting application, the user's current
    /// validity vector is pushed through `collaborator` after the flag is
    /// committed.
    ///
    /// The push only fires when `collaborator` reports the admin identity
    /// stored for `dapp` at registration: the callback is untrusted input,
    /// and an object claiming to speak for an application it does not
    /// administer receives nothing. The consent flag itself commits either
    /// way.
    pub fn set_consent(
        &mut self,
        caller: Identity,
        dapp: Identity,
        approved: bool,
        collaborator: &dyn ConsumerCallback,
    ) {
        self.consents_mut().insert((caller, dapp), approved);
        tracing::info!(user = %caller, dapp = %dapp, approved, "consent updated");
        self.record_event(EventKind::ConsentUpdated {
            user: caller,
            dapp,
            approved,
        });

        let auto = approved
            && self.dapp(&dapp).is_some_and(|r| {
                r.auto_whitelist && r.admin == collaborator.admin_identity()
            });
        if auto {
            let vector = self.validity_vector(&caller);
            collaborator.push_validity(&caller, vector);
            self.record_event(EventKind::ValidityPushed {
                user: caller,
                dapp,
                vector,
            });
        }
    }

    /// Whether the user currently consents to the application.
    pub fn has_consent(&self, user: &Identity, dapp: &Identity) -> bool {
        self.consents().get(&(*user, *dapp)).copied().unwrap_or(false)
    }

    // ── Disclosure ───────────────────────────────────────────────────

    /// Full view of a user's record.
    ///
    /// Permitted to the subject themselves or to a whitelisted certifier,
    /// proven by `attestation`. An identity with no record yields the
    /// default-empty view rather than an error, so callers cannot discover
    /// which identities exist.
    pub fn view_user(
        &self,
        caller: Identity,
        subject: Identity,
        attestation: &SignedAttestation,
    ) -> Result<ProfileView, RegistryError> {
        self.authorize_self_or_certifier(caller, subject, QueryPurpose::UserData, attestation)?;
        let view = match self.user(&subject) {
            Some(record) => ProfileView {
                certs: record.certs.clone(),
                name: record.name.clone(),
                email: record.email.clone(),
                phone: record.phone.clone(),
                passport_hash: record.passport_hash.clone(),
                drivers_license_hash: record.drivers_license_hash.clone(),
                tax_return_hash: record.tax_return_hash.clone(),
                encryption_key: record.encryption_key.clone(),
            },
            None => ProfileView::default(),
        };
        Ok(view)
    }

    /// Consent-scoped review of a user by an application admin.
    ///
    /// Requires the application to be registered, the caller to prove by
    /// signature that they are the admin stored at registration, and the
    /// user to currently consent to this application. Personal fields the
    /// application never requested come back as empty strings.
    pub fn review_user(
        &self,
        caller: Identity,
        dapp: Identity,
        user: Identity,
        attestation: &SignedAttestation,
    ) -> Result<UserDisclosure, RegistryError> {
        let record_dapp = self.dapp(&dapp).ok_or_else(|| RegistryError::NotPermitted {
            reason: "application is not registered".to_string(),
        })?;
        self.authorize_dapp_admin(caller, dapp, user, QueryPurpose::UserReview, attestation)?;
        if !self.has_consent(&user, &dapp) {
            return Err(RegistryError::NotPermitted {
                reason: "user has not consented to this application".to_string(),
            });
        }

        let requested = |field: VisibilityField| record_dapp.visibility_requests.contains(&field);
        let scoped = |field: VisibilityField, value: &str| {
            if requested(field) {
                value.to_string()
            } else {
                String::new()
            }
        };

        let disclosure = match self.user(&user) {
            Some(record) => UserDisclosure {
                certs: record.certs.clone(),
                name: scoped(VisibilityField::Name, &record.name),
                email: scoped(VisibilityField::Email, &record.email),
                phone: scoped(VisibilityField::Phone, &record.phone),
                passport_hash: scoped(VisibilityField::Passport, &record.passport_hash),
                drivers_license_hash: scoped(VisibilityField::License, &record.drivers_license_hash),
                tax_return_hash: scoped(VisibilityField::Taxes, &record.tax_return_hash),
            },
            None => UserDisclosure::default(),
        };
        Ok(disclosure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::sync::Arc;

    use vouch_core::{ManualClock, Timestamp, ValidityVector};
    use vouch_crypto::{attestation_digest, SigningKeyPair};

    use crate::store::{DappRecord, DocumentBundle, RegistryConfig};

    struct MockConsumer {
        admin: Identity,
        pushes: RefCell<Vec<(Identity, ValidityVector)>>,
    }

    impl MockConsumer {
        fn new(admin: Identity) -> Self {
            Self {
                admin,
                pushes: RefCell::new(Vec::new()),
            }
        }
    }

    impl ConsumerCallback for MockConsumer {
        fn admin_identity(&self) -> Identity {
            self.admin
        }

        fn push_validity(&self, user: &Identity, vector: ValidityVector) {
            self.pushes.borrow_mut().push((*user, vector));
        }
    }

    fn id(b: u8) -> Identity {
        Identity::from_bytes([b; 20])
    }

    fn setup() -> Registry {
        let clock = Arc::new(ManualClock::new(
            Timestamp::parse("2026-01-01T00:00:00Z").unwrap(),
        ));
        Registry::with_clock(
            RegistryConfig {
                operator: id(0xee),
                certifier_fee: 10,
                dapp_subscription_fee: 100,
            },
            clock,
        )
    }

    fn install_dapp(
        reg: &mut Registry,
        dapp: Identity,
        admin: Identity,
        auto: bool,
        fields: &[VisibilityField],
    ) {
        reg.dapps_mut().insert(
            dapp,
            DappRecord {
                admin,
                auto_whitelist: auto,
                subscription_expiration: Timestamp::parse("2027-01-01T00:00:00Z").unwrap(),
                visibility_requests: fields.iter().copied().collect::<HashSet<_>>(),
            },
        );
    }

    fn bundle() -> DocumentBundle {
        DocumentBundle {
            name: "alice".to_string(),
            email: "enc:email".to_string(),
            phone: "enc:phone".to_string(),
            passport_hash: "hash:passport".to_string(),
            drivers_license_hash: "hash:license".to_string(),
            tax_return_hash: "hash:taxes".to_string(),
            encryption_key: "key:primary".to_string(),
        }
    }

    fn attest(kp: &SigningKeyPair, purpose: QueryPurpose, subject: &Identity) -> SignedAttestation {
        let digest = attestation_digest(purpose, subject);
        SignedAttestation {
            message_hash: digest,
            signature: kp.sign_prehash(&digest).unwrap(),
        }
    }

    // ── consent ──────────────────────────────────────────────────────

    #[test]
    fn test_consent_defaults_to_false() {
        let reg = setup();
        assert!(!reg.has_consent(&id(1), &id(0xd0)));
    }

    #[test]
    fn test_consent_grant_and_revoke() {
        let mut reg = setup();
        let consumer = MockConsumer::new(id(0xaa));
        reg.set_consent(id(1), id(0xd0), true, &consumer);
        assert!(reg.has_consent(&id(1), &id(0xd0)));
        reg.set_consent(id(1), id(0xd0), false, &consumer);
        assert!(!reg.has_consent(&id(1), &id(0xd0)));
    }

    #[test]
    fn test_consent_is_per_application() {
        let mut reg = setup();
        let consumer = MockConsumer::new(id(0xaa));
        reg.set_consent(id(1), id(0xd0), true, &consumer);
        assert!(!reg.has_consent(&id(1), &id(0xd1)));
    }

    #[test]
    fn test_grant_to_auto_whitelisting_dapp_pushes_vector() {
        let mut reg = setup();
        install_dapp(&mut reg, id(0xd0), id(0xaa), true, &[]);
        let consumer = MockConsumer::new(id(0xaa));
        reg.set_consent(id(1), id(0xd0), true, &consumer);

        let pushes = consumer.pushes.borrow();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, id(1));
        assert_eq!(pushes[0].1, ValidityVector::none());
    }

    #[test]
    fn test_no_push_without_auto_whitelist() {
        let mut reg = setup();
        install_dapp(&mut reg, id(0xd0), id(0xaa), false, &[]);
        let consumer = MockConsumer::new(id(0xaa));
        reg.set_consent(id(1), id(0xd0), true, &consumer);
        assert!(consumer.pushes.borrow().is_empty());
    }

    #[test]
    fn test_no_push_to_callback_not_matching_registered_admin() {
        // A callback claiming to speak for an application it does not
        // administer receives nothing; the consent flag still commits.
        let mut reg = setup();
        install_dapp(&mut reg, id(0xd0), id(0xaa), true, &[]);
        let forged = MockConsumer::new(id(0x66));
        reg.set_consent(id(1), id(0xd0), true, &forged);
        assert!(forged.pushes.borrow().is_empty());
        assert!(reg.has_consent(&id(1), &id(0xd0)));
        assert!(!reg
            .events()
            .iter()
            .any(|e| matches!(e.kind, EventKind::ValidityPushed { .. })));
    }

    #[test]
    fn test_no_push_on_revoke() {
        let mut reg = setup();
        install_dapp(&mut reg, id(0xd0), id(0xaa), true, &[]);
        let consumer = MockConsumer::new(id(0xaa));
        reg.set_consent(id(1), id(0xd0), false, &consumer);
        assert!(consumer.pushes.borrow().is_empty());
    }

    #[test]
    fn test_no_push_to_unregistered_dapp() {
        let mut reg = setup();
        let consumer = MockConsumer::new(id(0xaa));
        reg.set_consent(id(1), id(0xd0), true, &consumer);
        assert!(consumer.pushes.borrow().is_empty());
        // The flag itself still committed.
        assert!(reg.has_consent(&id(1), &id(0xd0)));
    }

    #[test]
    fn test_consent_committed_before_push() {
        let mut reg = setup();
        install_dapp(&mut reg, id(0xd0), id(0xaa), true, &[]);
        let consumer = MockConsumer::new(id(0xaa));
        reg.set_consent(id(1), id(0xd0), true, &consumer);
        // ConsentUpdated precedes ValidityPushed in the log.
        let kinds: Vec<_> = reg
            .events()
            .iter()
            .map(|e| std::mem::discriminant(&e.kind))
            .collect();
        let consent_pos = reg
            .events()
            .iter()
            .position(|e| matches!(e.kind, EventKind::ConsentUpdated { .. }))
            .unwrap();
        let push_pos = reg
            .events()
            .iter()
            .position(|e| matches!(e.kind, EventKind::ValidityPushed { .. }))
            .unwrap();
        assert!(consent_pos < push_pos);
        assert_eq!(kinds.len(), 2);
    }

    // ── view_user ────────────────────────────────────────────────────

    #[test]
    fn test_self_view_returns_full_record() {
        let mut reg = setup();
        let kp = SigningKeyPair::generate();
        let me = kp.identity();
        reg.submit_documents(me, bundle());

        let att = attest(&kp, QueryPurpose::UserData, &me);
        let view = reg.view_user(me, me, &att).unwrap();
        assert_eq!(view.name, "alice");
        assert_eq!(view.encryption_key, "key:primary");
    }

    #[test]
    fn test_view_of_unknown_user_is_default_empty() {
        let mut reg = setup();
        let kp = SigningKeyPair::generate();
        reg.whitelist_mut().insert(kp.identity());
        let ghost = id(0x42);
        let att = attest(&kp, QueryPurpose::UserData, &ghost);
        let view = reg.view_user(kp.identity(), ghost, &att).unwrap();
        assert_eq!(view, ProfileView::default());
    }

    #[test]
    fn test_view_rejected_for_stranger() {
        let mut reg = setup();
        let kp = SigningKeyPair::generate();
        let subject = id(0x05);
        reg.submit_documents(subject, bundle());
        let att = attest(&kp, QueryPurpose::UserData, &subject);
        assert_eq!(
            reg.view_user(kp.identity(), subject, &att),
            Err(RegistryError::Unauthorized)
        );
    }

    // ── review_user ──────────────────────────────────────────────────

    fn review_setup(
        fields: &[VisibilityField],
    ) -> (Registry, SigningKeyPair, Identity, Identity) {
        let mut reg = setup();
        let admin_kp = SigningKeyPair::generate();
        let dapp = id(0xd0);
        let user = id(0x01);
        install_dapp(&mut reg, dapp, admin_kp.identity(), false, fields);
        reg.submit_documents(user, bundle());
        let consumer = MockConsumer::new(admin_kp.identity());
        reg.set_consent(user, dapp, true, &consumer);
        (reg, admin_kp, dapp, user)
    }

    #[test]
    fn test_review_filters_unrequested_fields() {
        let (reg, kp, dapp, user) =
            review_setup(&[VisibilityField::Name, VisibilityField::Taxes]);
        let att = attest(&kp, QueryPurpose::UserReview, &user);
        let d = reg.review_user(kp.identity(), dapp, user, &att).unwrap();
        assert_eq!(d.name, "alice");
        assert_eq!(d.tax_return_hash, "hash:taxes");
        assert_eq!(d.email, "");
        assert_eq!(d.phone, "");
        assert_eq!(d.passport_hash, "");
        assert_eq!(d.drivers_license_hash, "");
    }

    #[test]
    fn test_review_with_empty_scope_discloses_nothing_personal() {
        let (reg, kp, dapp, user) = review_setup(&[]);
        let att = attest(&kp, QueryPurpose::UserReview, &user);
        let d = reg.review_user(kp.identity(), dapp, user, &att).unwrap();
        assert!(d.certs.is_empty());
        assert_eq!(d, UserDisclosure::default());
    }

    #[test]
    fn test_review_without_consent_rejected() {
        let (mut reg, kp, dapp, user) = review_setup(&[VisibilityField::Name]);
        let consumer = MockConsumer::new(kp.identity());
        reg.set_consent(user, dapp, false, &consumer);
        let att = attest(&kp, QueryPurpose::UserReview, &user);
        let err = reg
            .review_user(kp.identity(), dapp, user, &att)
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotPermitted { .. }));
    }

    #[test]
    fn test_review_by_non_admin_rejected() {
        // A consented user and a valid signature are not enough: the signer
        // must be the admin stored for the application at registration.
        let (reg, _kp, dapp, user) = review_setup(&[VisibilityField::Name]);
        let other = SigningKeyPair::generate();
        let att = attest(&other, QueryPurpose::UserReview, &user);
        assert_eq!(
            reg.review_user(other.identity(), dapp, user, &att),
            Err(RegistryError::Unauthorized)
        );
    }

    #[test]
    fn test_review_against_unregistered_dapp_rejected() {
        let mut reg = setup();
        let kp = SigningKeyPair::generate();
        let dapp = id(0xd0);
        let user = id(0x01);
        let consumer = MockConsumer::new(kp.identity());
        reg.set_consent(user, dapp, true, &consumer);
        let att = attest(&kp, QueryPurpose::UserReview, &user);
        let err = reg
            .review_user(kp.identity(), dapp, user, &att)
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotPermitted { .. }));
    }
}
