//! Carona Core - business logic for university ride sharing
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (UserProfile, Account, Ride, etc.)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration (accounts, rides, routes, ...)
//! - **adapters**: Concrete implementations (DuckDB, in-memory, demo data)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbStore;
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    Account, ChatMessage, DriverProfile, FavoriteRoute, HistoryStats, NewUserProfile, Occupation,
    PassengerProfile, ProfileKind, ProfileUpdate, Rating, RatingStats, Ride, RideInput, RideKind,
    RideStatus, UserProfile, UserSnapshot, ValidationStatus, Vehicle,
};

/// Main context for Carona operations
///
/// This is the primary entry point for all business logic. It holds the
/// store, configuration, and all services. The ride store is reached
/// through [`CaronaContext::rides`], which follows the account session even
/// when it was changed through `accounts` directly.
pub struct CaronaContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub accounts: AccountService,
    rides: RideService,
    pub routes: FavoriteRouteService,
    pub ratings: RatingService,
    pub chat: ChatService,
    pub preferences: PreferencesService,
    db_path: Option<PathBuf>,
}

impl CaronaContext {
    /// Open the store in `data_dir` (the demo store in demo mode)
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let db_path = data_dir.join(config.store_file());
        let store = Arc::new(DuckDbStore::new(&db_path)?);
        store.ensure_schema()?;

        let mut context = Self::with_store(store)?;
        context.config = config;
        context.db_path = Some(db_path);
        Ok(context)
    }

    /// Wire every service over an arbitrary store
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let accounts = AccountService::new(Arc::clone(&store))?;
        let owner = accounts.current_id().map(str::to_string);
        let rides = RideService::for_account(Arc::clone(&store), owner)?;

        Ok(Self {
            config: Config::default(),
            accounts,
            rides,
            routes: FavoriteRouteService::new(Arc::clone(&store)),
            ratings: RatingService::new(Arc::clone(&store)),
            chat: ChatService::new(Arc::clone(&store)),
            preferences: PreferencesService::new(Arc::clone(&store)),
            store,
            db_path: None,
        })
    }

    /// Path of the store file, `None` when running over an injected store
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// The ride store, scoped to the current session
    pub fn rides(&mut self) -> domain::result::Result<&mut RideService> {
        let current = self.accounts.current_id().map(str::to_string);
        if self.rides.owner() != current.as_deref() {
            self.rides.switch_account(current)?;
        }
        Ok(&mut self.rides)
    }

    /// Log in and re-scope the ride store to the new account
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        wants_driver: bool,
    ) -> domain::result::Result<Account> {
        let account = self.accounts.login(email, password, wants_driver)?;
        self.rides.switch_account(Some(account.id().to_string()))?;
        Ok(account)
    }

    /// Log out and drop the ride store's scope
    pub fn logout(&mut self) -> domain::result::Result<()> {
        self.accounts.logout()?;
        self.rides.switch_account(None)
    }
}
