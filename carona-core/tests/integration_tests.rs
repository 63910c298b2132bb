//! Integration tests for carona-core services
//!
//! These tests run the account and ride stores end to end, over the
//! in-memory store, over a store that fails on demand, and over a real
//! DuckDB file.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use carona_core::adapters::MemoryStore;
use carona_core::domain::result::Result as CoreResult;
use carona_core::ports::{keys, KeyValueStore, KeyValueStoreExt, WriteBatch};
use carona_core::services::{AccountService, CredentialHasher, CredentialParams, RideService};
use carona_core::{
    CaronaContext, Error, NewUserProfile, Occupation, ProfileKind, Ride, RideInput, RideKind,
    RideStatus, UserProfile, UserSnapshot, ValidationStatus, Vehicle,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Store that can be switched to reject every write
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> CoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage("disk full"));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.check()?;
        self.inner.remove(key)
    }

    fn keys(&self, prefix: &str) -> CoreResult<Vec<String>> {
        self.inner.keys(prefix)
    }

    fn apply(&self, batch: WriteBatch) -> CoreResult<()> {
        self.check()?;
        self.inner.apply(batch)
    }
}

fn accounts(store: Arc<dyn KeyValueStore>) -> AccountService {
    AccountService::with_hasher(store, CredentialHasher::new(CredentialParams::minimal()))
        .expect("Failed to create account service")
}

fn member(email: &str, occupation: Occupation) -> NewUserProfile {
    NewUserProfile {
        name: "João Santos".to_string(),
        email: email.to_string(),
        phone: "(83) 99999-0000".to_string(),
        age: 21,
        occupation,
        photo: None,
        city: Some("João Pessoa".to_string()),
        nationality: None,
        document: None,
    }
}

fn contractor(email: &str) -> NewUserProfile {
    NewUserProfile {
        document: Some("contrato.pdf".to_string()),
        ..member(email, Occupation::Contractor)
    }
}

fn snapshot() -> UserSnapshot {
    UserSnapshot {
        name: "João Santos".to_string(),
        photo: String::new(),
        rating: 4.8,
        occupation: Occupation::Student,
    }
}

fn offer(time: &str, seats: u32) -> RideInput {
    RideInput {
        user: snapshot(),
        time: time.to_string(),
        departure: "CI".to_string(),
        destination: "Manaíra".to_string(),
        price: Some(Decimal::new(5, 0)),
        share_fuel: true,
        description: None,
        kind: RideKind::Offer {
            available_seats: seats,
            vehicle: Some("Honda Civic Prata".to_string()),
            allow_detour: false,
        },
    }
}

fn request(time: &str) -> RideInput {
    RideInput {
        kind: RideKind::Request { requested_seats: 1 },
        price: None,
        ..offer(time, 1)
    }
}

fn civic() -> Vehicle {
    Vehicle::new("Honda", "Civic", 2019, "QFX-1A23", "Prata")
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_duplicate_email_leaves_first_record_untouched() {
    let store = Arc::new(MemoryStore::new());
    let service = accounts(store.clone());

    let first = service
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    let before = store.snapshot().unwrap();

    let mut other = member("  JOAO@ufpb.br ", Occupation::Professor);
    other.name = "Outro Nome".to_string();
    let err = service.register(other, "outrasenha").unwrap_err();

    assert!(matches!(err, Error::DuplicateEmail(ref email) if email == "joao@ufpb.br"));
    assert_eq!(store.snapshot().unwrap(), before);

    let stored: UserProfile = store.get_json(&keys::user(first.id())).unwrap().unwrap();
    assert_eq!(stored.name, "João Santos");
    assert_eq!(stored.occupation, Occupation::Student);
}

#[test]
fn test_validation_fields_follow_occupation() {
    let store = Arc::new(MemoryStore::new());
    let service = accounts(store);

    for (i, occupation) in [Occupation::Student, Occupation::Professor, Occupation::Staff]
        .into_iter()
        .enumerate()
    {
        let account = service
            .register(member(&format!("m{}@ufpb.br", i), occupation), "segredo1")
            .unwrap();
        assert!(!account.profile.needs_validation);
        assert!(account.profile.is_validated);
        assert_eq!(account.profile.validation_status, ValidationStatus::Approved);
    }

    let account = service.register(contractor("t@ufpb.br"), "segredo1").unwrap();
    assert!(account.profile.needs_validation);
    assert!(!account.profile.is_validated);
    assert_eq!(account.profile.validation_status, ValidationStatus::Pending);
}

#[test]
fn test_contractor_without_document_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let service = accounts(store.clone());

    let err = service
        .register(member("t@ufpb.br", Occupation::Contractor), "segredo1")
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_registration_records_every_key() {
    let store = Arc::new(MemoryStore::new());
    let service = accounts(store.clone());
    let account = service
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    let id = account.id();

    let emails: BTreeMap<String, String> = store.get_json_or_default(keys::USER_EMAILS).unwrap();
    assert_eq!(emails["joao@ufpb.br"], id);

    let registry: Vec<UserProfile> = store.get_json_or_default(keys::REGISTERED_USERS).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0].id, id);

    assert!(store.get(&keys::passenger(id)).unwrap().is_some());
    assert!(store.get(&keys::driver(id)).unwrap().is_none());
    assert_eq!(
        store.get(&keys::active_profile(id)).unwrap().as_deref(),
        Some("passenger")
    );

    let raw_user = store.get(&keys::user(id)).unwrap().unwrap();
    assert!(raw_user.contains("\"validationStatus\":\"approved\""));
    assert!(raw_user.contains("\"occupation\":\"aluno\""));
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn test_login_errors() {
    let store = Arc::new(MemoryStore::new());
    let mut service = accounts(store.clone());
    service
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    service.register(contractor("t@ufpb.br"), "segredo1").unwrap();

    assert!(matches!(
        service.login("ninguem@ufpb.br", "segredo1", false),
        Err(Error::UserNotFound(_))
    ));
    assert!(matches!(
        service.login("joao@ufpb.br", "errada", false),
        Err(Error::WrongPassword)
    ));
    assert!(matches!(
        service.login("t@ufpb.br", "segredo1", false),
        Err(Error::PendingValidation(ValidationStatus::Pending))
    ));
    assert!(service.current().is_none());
    assert!(store.get(keys::CURRENT_USER_ID).unwrap().is_none());
}

#[test]
fn test_login_as_driver_without_driver_profile_keeps_session() {
    let store = Arc::new(MemoryStore::new());
    let mut service = accounts(store.clone());
    service
        .register(member("ana@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    let joao = service
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();

    service.login("joao@ufpb.br", "segredo1", false).unwrap();

    let err = service.login("ana@ufpb.br", "segredo1", true).unwrap_err();
    assert!(matches!(err, Error::MissingProfile(ProfileKind::Driver)));
    assert_eq!(service.current_id(), Some(joao.id()));
    assert_eq!(
        store.get(keys::CURRENT_USER_ID).unwrap().as_deref(),
        Some(joao.id())
    );
}

#[test]
fn test_approved_contractor_can_log_in() {
    let store = Arc::new(MemoryStore::new());
    let mut service = accounts(store);
    let account = service.register(contractor("t@ufpb.br"), "segredo1").unwrap();

    let profile = service
        .set_validation_status(account.id(), ValidationStatus::Approved)
        .unwrap();
    assert!(profile.is_validated);
    assert_eq!(
        service.list_accounts().unwrap()[0].validation_status,
        ValidationStatus::Approved
    );

    service.login("t@ufpb.br", "segredo1", false).unwrap();

    service
        .set_validation_status(account.id(), ValidationStatus::Rejected)
        .unwrap();
    service.logout().unwrap();
    assert!(matches!(
        service.login("t@ufpb.br", "segredo1", false),
        Err(Error::PendingValidation(ValidationStatus::Rejected))
    ));
}

#[test]
fn test_session_is_restored_from_store() {
    let store = Arc::new(MemoryStore::new());
    let mut service = accounts(store.clone());
    service
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    let account = service.login("joao@ufpb.br", "segredo1", false).unwrap();
    service
        .create_driver_profile(civic(), "cnh.jpg", "crlv.jpg")
        .unwrap();

    let restored = accounts(store.clone());
    let current = restored.current().unwrap();
    assert_eq!(current.id(), account.id());
    assert_eq!(current.active_profile(), ProfileKind::Driver);
    assert_eq!(current.driver_profile.as_ref().unwrap().vehicle.plate, "QFX1A23");

    service.logout().unwrap();
    assert!(accounts(store.clone()).current().is_none());
    assert!(store.get(keys::CURRENT_USER).unwrap().is_none());
}

// ============================================================================
// Profile switching
// ============================================================================

#[test]
fn test_toggle_with_only_passenger_profile_fails() {
    let store = Arc::new(MemoryStore::new());
    let mut service = accounts(store.clone());
    service
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    service.login("joao@ufpb.br", "segredo1", false).unwrap();
    let before = store.snapshot().unwrap();

    let err = service.toggle_driver_mode().unwrap_err();
    assert!(matches!(err, Error::MissingProfile(ProfileKind::Driver)));
    assert!(!service.current().unwrap().is_driver);
    assert_eq!(store.snapshot().unwrap(), before);
}

#[test]
fn test_driver_setup_and_toggle() {
    let store = Arc::new(MemoryStore::new());
    let mut service = accounts(store.clone());
    service
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    let account = service.login("joao@ufpb.br", "segredo1", false).unwrap();

    let bad = Vehicle::new("Honda", "Civic", 2019, "12345", "Prata");
    assert!(matches!(
        service.create_driver_profile(bad, "cnh.jpg", "crlv.jpg"),
        Err(Error::Validation(_))
    ));
    assert!(store.get(&keys::driver(account.id())).unwrap().is_none());

    let updated = service
        .create_driver_profile(civic(), "cnh.jpg", "crlv.jpg")
        .unwrap();
    assert!(updated.is_driver);
    assert!(updated.has_driver_profile && updated.has_passenger_profile);

    assert_eq!(service.toggle_driver_mode().unwrap(), ProfileKind::Passenger);
    assert!(!service.current().unwrap().is_driver);
    assert_eq!(
        store.get(&keys::active_profile(account.id())).unwrap().as_deref(),
        Some("passenger")
    );
    assert_eq!(service.toggle_driver_mode().unwrap(), ProfileKind::Driver);

    // Driver data survives a round trip through the passenger side
    service.logout().unwrap();
    let again = service.login("joao@ufpb.br", "segredo1", true).unwrap();
    assert!(again.is_driver);
}

// ============================================================================
// Rides
// ============================================================================

#[test]
fn test_rides_are_newest_first_with_unique_ids() {
    let store = Arc::new(MemoryStore::new());
    let mut rides = RideService::for_account(store, Some("u1".to_string())).unwrap();

    let posted: Vec<Ride> = ["07:00", "08:00", "09:00"]
        .iter()
        .map(|t| rides.add_ride(offer(t, 2)).unwrap().unwrap())
        .collect();

    let times: Vec<&str> = rides.rides().iter().map(|r| r.time.as_str()).collect();
    assert_eq!(times, vec!["09:00", "08:00", "07:00"]);
    assert!(rides.rides().iter().all(|r| r.status == RideStatus::Active));

    let mut ids: Vec<&str> = posted.iter().map(|r| r.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_completion_copies_into_history_once() {
    let store = Arc::new(MemoryStore::new());
    let mut rides = RideService::for_account(store, Some("u1".to_string())).unwrap();
    let ride = rides.add_ride(offer("18:00", 3)).unwrap().unwrap();

    assert!(rides.update_status(&ride.id, RideStatus::Completed).unwrap());
    assert!(!rides.update_status(&ride.id, RideStatus::Completed).unwrap());

    assert_eq!(rides.history().len(), 1);
    assert_eq!(rides.history()[0].id, ride.id);
}

#[test]
fn test_unknown_ids_change_nothing() {
    let store = Arc::new(MemoryStore::new());
    let mut rides = RideService::for_account(store.clone(), Some("u1".to_string())).unwrap();
    rides.add_ride(offer("18:00", 3)).unwrap();
    rides.add_request(request("07:30")).unwrap();
    let before = store.snapshot().unwrap();

    assert!(!rides.cancel_ride("nope").unwrap());
    assert!(!rides.cancel_request("nope").unwrap());
    assert!(!rides.update_status("nope", RideStatus::Completed).unwrap());

    assert_eq!(store.snapshot().unwrap(), before);
    assert_eq!(rides.rides().len(), 1);
    assert_eq!(rides.requests().len(), 1);
    assert!(rides.history().is_empty());
}

#[test]
fn test_shared_id_updates_both_collections() {
    let store = Arc::new(MemoryStore::new());
    let mut rides = RideService::for_account(store.clone(), Some("u1".to_string())).unwrap();
    let ride = rides.add_ride(offer("18:00", 3)).unwrap().unwrap();

    // Same id in both live collections, as an older client could write
    let mut twin = ride.clone();
    twin.kind = RideKind::Request { requested_seats: 1 };
    store.set_json(&keys::requests("u1"), &vec![twin]).unwrap();
    rides.switch_account(Some("u1".to_string())).unwrap();

    rides.update_status(&ride.id, RideStatus::Completed).unwrap();
    assert_eq!(rides.rides()[0].status, RideStatus::Completed);
    assert_eq!(rides.requests()[0].status, RideStatus::Completed);
    assert_eq!(rides.history().len(), 1);
    assert!(rides.history()[0].is_offer());
}

// ============================================================================
// Atomicity
// ============================================================================

#[test]
fn test_failed_writes_leave_state_untouched() {
    let store = Arc::new(FlakyStore::default());
    let mut service = accounts(store.clone());

    store.fail_writes(true);
    assert!(matches!(
        service.register(member("joao@ufpb.br", Occupation::Student), "segredo1"),
        Err(Error::Storage(_))
    ));
    assert!(store.inner.is_empty().unwrap());

    store.fail_writes(false);
    service
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();

    store.fail_writes(true);
    assert!(service.login("joao@ufpb.br", "segredo1", false).is_err());
    assert!(service.current().is_none());

    store.fail_writes(false);
    let account = service.login("joao@ufpb.br", "segredo1", false).unwrap();

    let mut rides =
        RideService::for_account(store.clone(), Some(account.id().to_string())).unwrap();
    let ride = rides.add_ride(offer("18:00", 3)).unwrap().unwrap();
    let before = store.inner.snapshot().unwrap();

    store.fail_writes(true);
    assert!(rides.cancel_ride(&ride.id).is_err());
    assert!(rides.update_status(&ride.id, RideStatus::Completed).is_err());
    assert!(rides.add_request(request("07:00")).is_err());
    assert_eq!(rides.rides().len(), 1);
    assert_eq!(rides.rides()[0].status, RideStatus::Active);
    assert!(rides.history().is_empty());
    assert_eq!(store.inner.snapshot().unwrap(), before);
}

// ============================================================================
// Shared board
// ============================================================================

#[test]
fn test_board_shows_posts_of_other_accounts() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut service = accounts(store.clone());
    let driver = service
        .register(member("driver@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    let passenger = service
        .register(member("passenger@ufpb.br", Occupation::Student), "segredo2")
        .unwrap();

    let mut driver_rides =
        RideService::for_account(store.clone(), Some(driver.id().to_string())).unwrap();
    let posted = driver_rides.add_ride(offer("07:00", 2)).unwrap().unwrap();

    service.login("passenger@ufpb.br", "segredo2", false).unwrap();
    let mut passenger_rides = RideService::new(store.clone()).unwrap();
    assert_eq!(passenger_rides.owner(), Some(passenger.id()));

    let board = passenger_rides.board(ProfileKind::Passenger).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].id, posted.id);
    assert_eq!(passenger_rides.search("manaíra").unwrap().len(), 1);

    let asked = passenger_rides.add_request(request("07:30")).unwrap().unwrap();
    assert!(passenger_rides.board(ProfileKind::Driver).unwrap().is_empty());
    let board = driver_rides.board(ProfileKind::Driver).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].id, asked.id);

    // Finished offers leave the board
    driver_rides.cancel_ride(&posted.id).unwrap();
    assert!(passenger_rides.board(ProfileKind::Passenger).unwrap().is_empty());
}

#[test]
fn test_context_rides_follow_session_changes_made_on_accounts() {
    let mut context = CaronaContext::with_store(Arc::new(MemoryStore::new())).unwrap();
    let first = context
        .accounts
        .register(member("ana@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    let second = context
        .accounts
        .register(member("bia@ufpb.br", Occupation::Staff), "segredo2")
        .unwrap();

    context.accounts.login("ana@ufpb.br", "segredo1", false).unwrap();
    let rides = context.rides().unwrap();
    assert_eq!(rides.owner(), Some(first.id()));
    rides.add_ride(offer("08:00", 2)).unwrap().unwrap();

    context.accounts.login("bia@ufpb.br", "segredo2", false).unwrap();
    let rides = context.rides().unwrap();
    assert_eq!(rides.owner(), Some(second.id()));
    assert!(rides.rides().is_empty());
    assert_eq!(rides.board(ProfileKind::Passenger).unwrap().len(), 1);

    context.accounts.logout().unwrap();
    assert_eq!(context.rides().unwrap().owner(), None);
}

// ============================================================================
// End to end
// ============================================================================

fn end_to_end(mut context: CaronaContext) {
    context
        .accounts
        .register(member("joao@ufpb.br", Occupation::Student), "segredo1")
        .unwrap();
    context.login("joao@ufpb.br", "segredo1", false).unwrap();

    let rides = context.rides().unwrap();
    rides.add_ride(offer("18:00", 3)).unwrap().unwrap();
    let ride = rides.rides()[0].clone();
    assert_eq!(ride.status, RideStatus::Active);
    assert_eq!(ride.departure, "CI");
    assert_eq!(ride.destination, "Manaíra");
    assert_eq!(ride.seats(), 3);

    assert!(rides.update_status(&ride.id, RideStatus::Completed).unwrap());
    assert_eq!(rides.history()[0].status, RideStatus::Completed);
    assert_eq!(rides.rides()[0].status, RideStatus::Completed);

    context.logout().unwrap();
    let rides = context.rides().unwrap();
    assert!(rides.rides().is_empty());
    assert!(rides.add_ride(offer("19:00", 1)).unwrap().is_none());
}

#[test]
fn test_end_to_end_in_memory() {
    let context = CaronaContext::with_store(Arc::new(MemoryStore::new())).unwrap();
    end_to_end(context);
}

#[test]
fn test_end_to_end_on_duckdb() {
    let temp_dir = TempDir::new().unwrap();
    let context = CaronaContext::new(temp_dir.path()).unwrap();
    assert!(context.db_path().unwrap().exists());
    end_to_end(context);

    // The session is gone but the history survives reopening the store
    let reopened = CaronaContext::new(temp_dir.path()).unwrap();
    assert!(reopened.accounts.current().is_none());
    assert_eq!(reopened.store.keys("rideHistory_").unwrap().len(), 1);
}
