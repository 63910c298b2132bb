//! Favorite route domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::new_token;

/// A named (departure, destination) pair saved by a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRoute {
    pub id: String,
    pub name: String,
    pub departure: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
}

impl FavoriteRoute {
    pub fn new(
        name: impl Into<String>,
        departure: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            id: new_token(),
            name: name.into().trim().to_string(),
            departure: departure.into().trim().to_string(),
            destination: destination.into().trim().to_string(),
            created_at: Utc::now(),
        }
    }

    /// All three fields are required
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_empty() || self.departure.is_empty() || self.destination.is_empty() {
            return Err("route name, departure and destination are required");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_validation() {
        assert!(FavoriteRoute::new("Casa", "Bessa", "CI").validate().is_ok());
        assert!(FavoriteRoute::new("Casa", " ", "CI").validate().is_err());
    }
}
