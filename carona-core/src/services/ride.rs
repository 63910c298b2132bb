//! Ride service - offers, requests and ride history of the active account
//!
//! The three collections live under `rides_<id>`, `requests_<id>` and
//! `rideHistory_<id>`, newest first. Without an account in scope every
//! mutation is a no-op. The board and search read the live collections of
//! every account.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{HistoryStats, ProfileKind, Ride, RideInput, RideStatus};
use crate::ports::{keys, KeyValueStore, KeyValueStoreExt, WriteBatch};

/// Ride service (the ride store)
pub struct RideService {
    store: Arc<dyn KeyValueStore>,
    owner: Option<String>,
    rides: Vec<Ride>,
    requests: Vec<Ride>,
    history: Vec<Ride>,
}

impl RideService {
    /// Scope the service to the persisted session, if any
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let owner = store.get(keys::CURRENT_USER_ID)?;
        Self::for_account(store, owner)
    }

    pub fn for_account(store: Arc<dyn KeyValueStore>, owner: Option<String>) -> Result<Self> {
        let mut service = Self {
            store,
            owner: None,
            rides: Vec::new(),
            requests: Vec::new(),
            history: Vec::new(),
        };
        service.switch_account(owner)?;
        Ok(service)
    }

    /// Re-scope to another account (or none) and reload its collections
    pub fn switch_account(&mut self, owner: Option<String>) -> Result<()> {
        let (rides, requests, history): (Vec<Ride>, Vec<Ride>, Vec<Ride>) =
            match owner.as_deref() {
                Some(id) => (
                    self.store.get_json_or_default(&keys::rides(id))?,
                    self.store.get_json_or_default(&keys::requests(id))?,
                    self.store.get_json_or_default(&keys::ride_history(id))?,
                ),
                None => Default::default(),
            };
        self.owner = owner;
        self.rides = rides;
        self.requests = requests;
        self.history = history;
        Ok(())
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn rides(&self) -> &[Ride] {
        &self.rides
    }

    pub fn requests(&self) -> &[Ride] {
        &self.requests
    }

    pub fn history(&self) -> &[Ride] {
        &self.history
    }

    // === Mutations ===

    /// Post a driver offer; `None` when no account is in scope
    pub fn add_ride(&mut self, input: RideInput) -> Result<Option<Ride>> {
        if !input.kind.is_offer() {
            return Err(Error::validation("a ride offer needs available seats"));
        }
        self.add(input, true)
    }

    /// Post a passenger request; `None` when no account is in scope
    pub fn add_request(&mut self, input: RideInput) -> Result<Option<Ride>> {
        if input.kind.is_offer() {
            return Err(Error::validation("a ride request needs requested seats"));
        }
        self.add(input, false)
    }

    fn add(&mut self, input: RideInput, offer: bool) -> Result<Option<Ride>> {
        let Some(owner) = self.owner.clone() else {
            return Ok(None);
        };
        input.validate().map_err(Error::Validation)?;

        let ride = Ride::from_input(input);
        let (key, current) = if offer {
            (keys::rides(&owner), &self.rides)
        } else {
            (keys::requests(&owner), &self.requests)
        };
        let mut updated = Vec::with_capacity(current.len() + 1);
        updated.push(ride.clone());
        updated.extend(current.iter().cloned());

        self.store.set_json(&key, &updated)?;
        if offer {
            self.rides = updated;
        } else {
            self.requests = updated;
        }
        Ok(Some(ride))
    }

    /// Move every entry with `id` in both live collections to `status`
    ///
    /// Only entries still active change. The first entry that actually
    /// reaches `completed` is copied to the front of the history; moving to
    /// `cancelled` takes the same path as [`RideService::cancel_ride`], so
    /// cancelled entries leave the live collections. Returns whether
    /// anything changed.
    pub fn update_status(&mut self, id: &str, status: RideStatus) -> Result<bool> {
        if status == RideStatus::Cancelled {
            return self.remove_entries(id, true, true, true);
        }
        let Some(owner) = self.owner.clone() else {
            return Ok(false);
        };

        let mut rides = self.rides.clone();
        let mut requests = self.requests.clone();
        let mut changed = false;
        let mut completed: Option<Ride> = None;

        for ride in rides.iter_mut().chain(requests.iter_mut()) {
            if ride.id != id || !ride.status.can_transition_to(status) {
                continue;
            }
            ride.status = status;
            changed = true;
            if status == RideStatus::Completed && completed.is_none() {
                completed = Some(ride.clone());
            }
        }
        if !changed {
            return Ok(false);
        }

        let mut history = self.history.clone();
        if let Some(snapshot) = completed {
            history.insert(0, snapshot);
        }

        let mut batch = WriteBatch::new();
        batch
            .set_json(keys::rides(&owner), &rides)?
            .set_json(keys::requests(&owner), &requests)?
            .set_json(keys::ride_history(&owner), &history)?;
        self.store.apply(batch)?;

        self.rides = rides;
        self.requests = requests;
        self.history = history;
        Ok(true)
    }

    /// Remove an offer; an active one leaves a cancelled copy in history
    pub fn cancel_ride(&mut self, id: &str) -> Result<bool> {
        self.remove_entries(id, true, false, false)
    }

    /// Remove a request; an active one leaves a cancelled copy in history
    pub fn cancel_request(&mut self, id: &str) -> Result<bool> {
        self.remove_entries(id, false, true, false)
    }

    /// Remove entries with `id` from the selected collections
    ///
    /// With `only_active`, finished entries stay where they are. The first
    /// removed entry that was still active is copied to the front of the
    /// history as `cancelled`, in the same batch as the removal.
    fn remove_entries(
        &mut self,
        id: &str,
        from_rides: bool,
        from_requests: bool,
        only_active: bool,
    ) -> Result<bool> {
        let Some(owner) = self.owner.clone() else {
            return Ok(false);
        };
        let removable =
            |r: &Ride| r.id == id && (!only_active || r.status == RideStatus::Active);

        let mut rides = self.rides.clone();
        let mut requests = self.requests.clone();
        let mut removed = Vec::new();
        if from_rides {
            removed.extend(extract(&mut rides, &removable));
        }
        if from_requests {
            removed.extend(extract(&mut requests, &removable));
        }
        if removed.is_empty() {
            return Ok(false);
        }

        let mut history = self.history.clone();
        let mut batch = WriteBatch::new();
        if from_rides {
            batch.set_json(keys::rides(&owner), &rides)?;
        }
        if from_requests {
            batch.set_json(keys::requests(&owner), &requests)?;
        }
        if let Some(mut snapshot) = removed
            .into_iter()
            .find(|r| r.status == RideStatus::Active)
        {
            snapshot.status = RideStatus::Cancelled;
            history.insert(0, snapshot);
            batch.set_json(keys::ride_history(&owner), &history)?;
        }
        self.store.apply(batch)?;

        self.rides = rides;
        self.requests = requests;
        self.history = history;
        Ok(true)
    }

    // === Queries ===

    /// Active entries posted by other members for the given side, newest
    /// first: drivers look for requests, passengers look for offers
    pub fn board(&self, viewer: ProfileKind) -> Result<Vec<Ride>> {
        let prefix = match viewer {
            ProfileKind::Driver => keys::REQUESTS_PREFIX,
            ProfileKind::Passenger => keys::RIDES_PREFIX,
        };
        let mut board = self.posted_by_others(prefix)?;
        board.retain(|r| r.status == RideStatus::Active);
        Ok(board)
    }

    /// Active offers and requests of every member, the active account's
    /// included, whose departure or destination matches `query`
    pub fn search(&self, query: &str) -> Result<Vec<Ride>> {
        let mut found: Vec<Ride> = self
            .rides
            .iter()
            .chain(self.requests.iter())
            .cloned()
            .chain(self.posted_by_others(keys::RIDES_PREFIX)?)
            .chain(self.posted_by_others(keys::REQUESTS_PREFIX)?)
            .filter(|r| r.status == RideStatus::Active && r.matches_place(query))
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    /// Live entries under `prefix` for every account but the one in scope
    fn posted_by_others(&self, prefix: &str) -> Result<Vec<Ride>> {
        let mut posted = Vec::new();
        for key in self.store.keys(prefix)? {
            if key.strip_prefix(prefix) == self.owner.as_deref() {
                continue;
            }
            posted.extend(self.store.get_json_or_default::<Vec<Ride>>(&key)?);
        }
        posted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posted)
    }

    pub fn find(&self, id: &str) -> Option<&Ride> {
        self.rides
            .iter()
            .chain(self.requests.iter())
            .chain(self.history.iter())
            .find(|r| r.id == id)
    }

    pub fn history_stats(&self) -> HistoryStats {
        HistoryStats::from_history(&self.history)
    }
}

/// Split the entries matching `matches` out of `list`
fn extract(list: &mut Vec<Ride>, matches: impl Fn(&Ride) -> bool) -> Vec<Ride> {
    let (taken, kept): (Vec<Ride>, Vec<Ride>) =
        std::mem::take(list).into_iter().partition(|r| matches(r));
    *list = kept;
    taken
}
