//! Favorite routes of a passenger

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{FavoriteRoute, PassengerProfile, ProfileKind};
use crate::ports::{keys, KeyValueStore, KeyValueStoreExt, WriteBatch};

/// Favorite route service
///
/// Routes are kept in `favoriteRoutes_<id>` in the order they were saved;
/// their ids are mirrored in the passenger profile.
pub struct FavoriteRouteService {
    store: Arc<dyn KeyValueStore>,
}

impl FavoriteRouteService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn passenger(&self, account_id: &str) -> Result<PassengerProfile> {
        self.store
            .get_json(&keys::passenger(account_id))?
            .ok_or(Error::MissingProfile(ProfileKind::Passenger))
    }

    pub fn list(&self, account_id: &str) -> Result<Vec<FavoriteRoute>> {
        self.store.get_json_or_default(&keys::favorite_routes(account_id))
    }

    pub fn get(&self, account_id: &str, route_id: &str) -> Result<Option<FavoriteRoute>> {
        Ok(self
            .list(account_id)?
            .into_iter()
            .find(|route| route.id == route_id))
    }

    /// Save a new route for the account
    pub fn add(
        &self,
        account_id: &str,
        name: &str,
        departure: &str,
        destination: &str,
    ) -> Result<FavoriteRoute> {
        let route = FavoriteRoute::new(name, departure, destination);
        route.validate().map_err(Error::validation)?;

        let mut passenger = self.passenger(account_id)?;
        let mut routes = self.list(account_id)?;
        routes.push(route.clone());
        passenger.favorite_routes.push(route.id.clone());

        let mut batch = WriteBatch::new();
        batch
            .set_json(keys::favorite_routes(account_id), &routes)?
            .set_json(keys::passenger(account_id), &passenger)?;
        self.store.apply(batch)?;

        Ok(route)
    }

    /// Delete a route; returns false for an unknown id
    pub fn delete(&self, account_id: &str, route_id: &str) -> Result<bool> {
        let mut routes = self.list(account_id)?;
        let before = routes.len();
        routes.retain(|route| route.id != route_id);
        if routes.len() == before {
            return Ok(false);
        }

        let mut batch = WriteBatch::new();
        batch.set_json(keys::favorite_routes(account_id), &routes)?;
        let passenger: Option<PassengerProfile> = self.store.get_json(&keys::passenger(account_id))?;
        if let Some(mut passenger) = passenger {
            passenger.favorite_routes.retain(|id| id != route_id);
            batch.set_json(keys::passenger(account_id), &passenger)?;
        }
        self.store.apply(batch)?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn service_with_passenger() -> (Arc<MemoryStore>, FavoriteRouteService) {
        let store = Arc::new(MemoryStore::new());
        store
            .set_json(&keys::passenger("u1"), &PassengerProfile::default())
            .unwrap();
        (store.clone(), FavoriteRouteService::new(store))
    }

    #[test]
    fn test_add_mirrors_id_in_passenger_profile() {
        let (store, routes) = service_with_passenger();
        let route = routes.add("u1", "Casa", "Bessa", "CI").unwrap();

        let passenger: PassengerProfile = store.get_json(&keys::passenger("u1")).unwrap().unwrap();
        assert_eq!(passenger.favorite_routes, vec![route.id.clone()]);
        assert_eq!(routes.get("u1", &route.id).unwrap(), Some(route));
    }

    #[test]
    fn test_routes_keep_insertion_order() {
        let (_store, routes) = service_with_passenger();
        routes.add("u1", "Casa", "Bessa", "CI").unwrap();
        routes.add("u1", "Trabalho", "CI", "Centro").unwrap();

        let names: Vec<String> = routes
            .list("u1")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Casa", "Trabalho"]);
    }

    #[test]
    fn test_delete_removes_mirror() {
        let (store, routes) = service_with_passenger();
        let route = routes.add("u1", "Casa", "Bessa", "CI").unwrap();

        assert!(routes.delete("u1", &route.id).unwrap());
        assert!(!routes.delete("u1", &route.id).unwrap());

        let passenger: PassengerProfile = store.get_json(&keys::passenger("u1")).unwrap().unwrap();
        assert!(passenger.favorite_routes.is_empty());
        assert!(routes.list("u1").unwrap().is_empty());
    }

    #[test]
    fn test_requires_passenger_profile() {
        let store = Arc::new(MemoryStore::new());
        let routes = FavoriteRouteService::new(store.clone());

        let err = routes.add("ghost", "Casa", "Bessa", "CI").unwrap_err();
        assert!(matches!(err, Error::MissingProfile(ProfileKind::Passenger)));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_incomplete_route_is_rejected() {
        let (_store, routes) = service_with_passenger();
        assert!(matches!(
            routes.add("u1", "", "Bessa", "CI"),
            Err(Error::Validation(_))
        ));
    }
}
