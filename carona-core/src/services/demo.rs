//! Demo service - manage demo mode
//!
//! Demo mode provides a seeded member with sample rides for trying the app
//! without touching real data. It uses its own store file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::adapters::demo::{
    demo_history, demo_member, demo_requests, demo_rides, demo_vehicle, DEMO_COMMUNITY_ID,
    DEMO_PASSWORD,
};
use crate::adapters::duckdb::DuckDbStore;
use crate::config::{Config, DEMO_STORE_FILE};
use crate::ports::{keys, KeyValueStore, WriteBatch};
use crate::services::credential::{CredentialHasher, CredentialParams};
use crate::services::AccountService;

/// Demo service for managing demo mode
pub struct DemoService {
    data_dir: PathBuf,
}

impl DemoService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.data_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// This will:
    /// 1. Delete any existing demo store (fresh start)
    /// 2. Enable demo mode in config
    /// 3. Create the demo store with the demo member logged in
    pub fn enable(&self) -> Result<()> {
        self.remove_demo_store()?;

        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.data_dir)?;

        let store = Arc::new(DuckDbStore::new(&self.data_dir.join(DEMO_STORE_FILE))?);
        store.ensure_schema()?;
        seed(store)?;

        Ok(())
    }

    /// Disable demo mode
    ///
    /// This will:
    /// 1. Disable demo mode in config
    /// 2. Optionally delete the demo store (if clean = true)
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.data_dir)?;

        if clean {
            self.remove_demo_store()?;
        }

        Ok(())
    }

    fn remove_demo_store(&self) -> Result<()> {
        let demo_db = self.data_dir.join(DEMO_STORE_FILE);
        let demo_wal = self.data_dir.join(format!("{}.wal", DEMO_STORE_FILE));
        if demo_db.exists() {
            std::fs::remove_file(&demo_db)?;
        }
        if demo_wal.exists() {
            std::fs::remove_file(&demo_wal)?;
        }
        Ok(())
    }
}

/// Register the demo member with both profiles, open a session and give it
/// the sample history; the sample offers and requests are posted by other
/// members so they show up on the board
pub fn seed(store: Arc<dyn KeyValueStore>) -> Result<()> {
    let member = demo_member();
    let email = member.email.clone();

    let mut accounts = AccountService::with_hasher(
        store.clone(),
        CredentialHasher::new(CredentialParams::minimal()),
    )?;
    accounts.register(member, DEMO_PASSWORD)?;
    accounts.login(&email, DEMO_PASSWORD, false)?;
    let account =
        accounts.create_driver_profile(demo_vehicle(), "cnh-demo.pdf", "crlv-demo.pdf")?;

    let id = account.id();
    let mut batch = WriteBatch::new();
    batch
        .set_json(keys::rides(DEMO_COMMUNITY_ID), &demo_rides())?
        .set_json(keys::requests(DEMO_COMMUNITY_ID), &demo_requests())?
        .set_json(keys::ride_history(id), &demo_history())?;
    store.apply(batch)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::services::RideService;
    use crate::ProfileKind;
    use tempfile::tempdir;

    #[test]
    fn test_seed_logs_in_demo_member() {
        let store = Arc::new(MemoryStore::new());
        seed(store.clone()).unwrap();

        let accounts = AccountService::new(store.clone()).unwrap();
        let account = accounts.current().unwrap();
        assert_eq!(account.active_profile(), ProfileKind::Driver);
        assert!(account.has_passenger_profile);

        let rides = RideService::new(store).unwrap();
        assert!(rides.rides().is_empty());
        assert_eq!(rides.board(ProfileKind::Passenger).unwrap().len(), 2);
        assert_eq!(rides.board(ProfileKind::Driver).unwrap().len(), 2);
        assert_eq!(rides.history_stats().total_rides, 1);
    }

    #[test]
    fn test_enable_and_disable() {
        let dir = tempdir().unwrap();
        let demo = DemoService::new(dir.path());

        demo.enable().unwrap();
        assert!(dir.path().join(DEMO_STORE_FILE).exists());

        demo.disable(true).unwrap();
        assert!(!dir.path().join(DEMO_STORE_FILE).exists());
    }
}
