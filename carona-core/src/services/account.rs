//! Account service - registration, sessions and the dual driver/passenger profile
//!
//! Owns the single active [`Account`] (or none) and the registry of every
//! registered member. Every multi-key update is committed as one
//! [`WriteBatch`], and in-memory state only changes after the batch lands,
//! so a failed operation leaves both untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::user::normalize_email;
use crate::domain::{
    Account, DriverProfile, NewUserProfile, PassengerProfile, ProfileKind, ProfileUpdate,
    UserProfile, ValidationStatus, Vehicle,
};
use crate::ports::{keys, KeyValueStore, KeyValueStoreExt, WriteBatch};

use super::credential::{is_hashed, CredentialHasher};

/// Account service (the account store)
pub struct AccountService {
    store: Arc<dyn KeyValueStore>,
    hasher: CredentialHasher,
    current: Option<Account>,
}

impl AccountService {
    /// Create the service and restore the persisted session, if any
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::with_hasher(store, CredentialHasher::default())
    }

    pub fn with_hasher(store: Arc<dyn KeyValueStore>, hasher: CredentialHasher) -> Result<Self> {
        let mut service = Self {
            store,
            hasher,
            current: None,
        };
        service.current = service.restore_session()?;
        Ok(service)
    }

    /// The active account, if a session is open
    pub fn current(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|a| a.id())
    }

    fn require_session(&self) -> Result<&Account> {
        self.current.as_ref().ok_or(Error::NoSession)
    }

    // === Registration ===

    /// Register a new member
    ///
    /// Does not start a session; call [`AccountService::login`] afterwards.
    pub fn register(&self, input: NewUserProfile, password: &str) -> Result<Account> {
        input.validate().map_err(Error::Validation)?;
        CredentialHasher::check_policy(password)?;

        let email = normalize_email(&input.email);
        let mut emails = self.email_index()?;
        if emails.contains_key(&email) {
            return Err(Error::DuplicateEmail(email));
        }

        let id = Uuid::new_v4().to_string();
        let profile = UserProfile::from_registration(id.clone(), input);
        let passenger = PassengerProfile::default();
        let credential = self.hasher.hash(password)?;

        emails.insert(email, id.clone());
        let mut passwords = self.password_index()?;
        passwords.insert(id.clone(), credential);
        let mut registry = self.list_accounts()?;
        registry.push(profile.clone());

        let mut batch = WriteBatch::new();
        batch
            .set_json(keys::user(&id), &profile)?
            .set_json(keys::passenger(&id), &passenger)?
            .set_json(keys::USER_EMAILS, &emails)?
            .set_json(keys::USER_PASSWORDS, &passwords)?
            .set_json(keys::REGISTERED_USERS, &registry)?
            .set(keys::active_profile(&id), ProfileKind::Passenger.as_str());
        self.store.apply(batch)?;

        Ok(Account::assemble(
            profile,
            None,
            Some(passenger),
            ProfileKind::Passenger,
        ))
    }

    // === Session lifecycle ===

    /// Open a session for `email`, activating the driver or passenger side
    pub fn login(&mut self, email: &str, password: &str, wants_driver: bool) -> Result<Account> {
        let email = normalize_email(email);
        let id = self
            .email_index()?
            .remove(&email)
            .ok_or_else(|| Error::UserNotFound(email.clone()))?;

        let mut passwords = self.password_index()?;
        let stored = passwords.get(&id).cloned().ok_or(Error::WrongPassword)?;
        if !self.hasher.verify(password, &stored)? {
            return Err(Error::WrongPassword);
        }

        let profile: UserProfile = self
            .store
            .get_json(&keys::user(&id))?
            .ok_or_else(|| Error::UserNotFound(email.clone()))?;
        if !profile.can_login() {
            return Err(Error::PendingValidation(profile.validation_status));
        }

        let driver: Option<DriverProfile> = self.store.get_json(&keys::driver(&id))?;
        let passenger: Option<PassengerProfile> = self.store.get_json(&keys::passenger(&id))?;
        let wanted = if wants_driver {
            ProfileKind::Driver
        } else {
            ProfileKind::Passenger
        };

        let account = Account::assemble(profile, driver, passenger, wanted);
        if !account.has_profile(wanted) {
            return Err(Error::MissingProfile(wanted));
        }

        let mut batch = WriteBatch::new();
        if !is_hashed(&stored) {
            passwords.insert(id.clone(), self.hasher.hash(password)?);
            batch.set_json(keys::USER_PASSWORDS, &passwords)?;
        }
        batch.set(keys::CURRENT_USER_ID, id.as_str());
        self.queue_session_snapshot(&mut batch, &account)?;
        self.store.apply(batch)?;

        self.current = Some(account.clone());
        Ok(account)
    }

    /// Close the session; the member's data stays untouched
    pub fn logout(&mut self) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.remove(keys::CURRENT_USER_ID).remove(keys::CURRENT_USER);
        self.store.apply(batch)?;
        self.current = None;
        Ok(())
    }

    /// Re-read the active account from the store
    ///
    /// Needed after other services touched the account's sub-records, e.g.
    /// favorite routes in the passenger profile.
    pub fn refresh(&mut self) -> Result<Option<&Account>> {
        self.current = self.restore_session()?;
        Ok(self.current.as_ref())
    }

    fn restore_session(&self) -> Result<Option<Account>> {
        let Some(id) = self.store.get(keys::CURRENT_USER_ID)? else {
            return Ok(None);
        };
        // A pointer to a vanished profile is treated as no session
        let Some(profile) = self.store.get_json::<UserProfile>(&keys::user(&id))? else {
            return Ok(None);
        };

        let active = self
            .store
            .get(&keys::active_profile(&id))?
            .and_then(|raw| raw.parse::<ProfileKind>().ok())
            .unwrap_or(ProfileKind::Passenger);
        let driver = self.store.get_json(&keys::driver(&id))?;
        let passenger = self.store.get_json(&keys::passenger(&id))?;

        Ok(Some(Account::assemble(profile, driver, passenger, active)))
    }

    // === Profiles ===

    /// Switch between the driver and passenger side
    ///
    /// Returns the side that is active afterwards.
    pub fn toggle_driver_mode(&mut self) -> Result<ProfileKind> {
        let account = self.require_session()?;
        let target = account.active_profile().opposite();
        if !account.has_profile(target) {
            return Err(Error::MissingProfile(target));
        }

        let mut updated = account.clone();
        updated.is_driver = target == ProfileKind::Driver;

        let mut batch = WriteBatch::new();
        self.queue_session_snapshot(&mut batch, &updated)?;
        self.store.apply(batch)?;

        self.current = Some(updated);
        Ok(target)
    }

    /// Driver setup: register the vehicle and documents, then activate the
    /// driver side. Calling it again replaces the previous driver profile.
    pub fn create_driver_profile(
        &mut self,
        vehicle: Vehicle,
        license_document: &str,
        registration_document: &str,
    ) -> Result<Account> {
        let account = self.require_session()?;
        let driver = DriverProfile {
            vehicle,
            license_document: license_document.trim().to_string(),
            registration_document: registration_document.trim().to_string(),
        };
        driver.validate().map_err(Error::Validation)?;

        let mut updated = account.clone();
        updated.driver_profile = Some(driver.clone());
        updated.has_driver_profile = true;
        updated.is_driver = true;

        let mut batch = WriteBatch::new();
        batch.set_json(keys::driver(updated.id()), &driver)?;
        self.queue_session_snapshot(&mut batch, &updated)?;
        self.store.apply(batch)?;

        self.current = Some(updated.clone());
        Ok(updated)
    }

    /// Edit the active member's contact details
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Account> {
        let account = self.require_session()?;
        update.validate().map_err(Error::Validation)?;

        let mut updated = account.clone();
        updated.profile.apply_update(update);

        let mut batch = WriteBatch::new();
        self.queue_profile_write(&mut batch, &updated.profile)?;
        self.queue_session_snapshot(&mut batch, &updated)?;
        self.store.apply(batch)?;

        self.current = Some(updated.clone());
        Ok(updated)
    }

    // === Registry ===

    /// Record the outcome of reviewing a contracted worker's documents
    pub fn set_validation_status(
        &mut self,
        user_id: &str,
        status: ValidationStatus,
    ) -> Result<UserProfile> {
        let mut profile = self
            .get_profile(user_id)?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;
        if !profile.needs_validation {
            return Err(Error::validation(format!(
                "{} accounts do not go through validation",
                profile.occupation
            )));
        }
        profile.set_validation_status(status);

        let mut batch = WriteBatch::new();
        self.queue_profile_write(&mut batch, &profile)?;
        self.store.apply(batch)?;

        if let Some(current) = self.current.as_mut().filter(|a| a.id() == user_id) {
            current.profile = profile.clone();
        }
        Ok(profile)
    }

    /// Every registered member, in registration order
    pub fn list_accounts(&self) -> Result<Vec<UserProfile>> {
        self.store.get_json_or_default(keys::REGISTERED_USERS)
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.store.get_json(&keys::user(user_id))
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        match self.email_index()?.get(&normalize_email(email)) {
            Some(id) => self.get_profile(id),
            None => Ok(None),
        }
    }

    // === Helpers ===

    fn email_index(&self) -> Result<BTreeMap<String, String>> {
        self.store.get_json_or_default(keys::USER_EMAILS)
    }

    fn password_index(&self) -> Result<BTreeMap<String, String>> {
        self.store.get_json_or_default(keys::USER_PASSWORDS)
    }

    /// Queue the per-id profile and its entry in the registry list
    fn queue_profile_write(&self, batch: &mut WriteBatch, profile: &UserProfile) -> Result<()> {
        let mut registry = self.list_accounts()?;
        match registry.iter_mut().find(|p| p.id == profile.id) {
            Some(entry) => *entry = profile.clone(),
            None => registry.push(profile.clone()),
        }
        batch
            .set_json(keys::user(&profile.id), profile)?
            .set_json(keys::REGISTERED_USERS, &registry)?;
        Ok(())
    }

    /// Queue the active-profile marker and the account snapshot
    fn queue_session_snapshot(&self, batch: &mut WriteBatch, account: &Account) -> Result<()> {
        batch
            .set(
                keys::active_profile(account.id()),
                account.active_profile().as_str(),
            )
            .set_json(keys::CURRENT_USER, account)?;
        Ok(())
    }
}
