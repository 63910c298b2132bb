//! Ratings members give each other after a ride

use std::sync::Arc;

use chrono::Utc;

use crate::domain::result::{Error, Result};
use crate::domain::{Rating, RatingStats};
use crate::ports::{keys, KeyValueStore, KeyValueStoreExt};

/// Rating service over the global `userRatings` list
pub struct RatingService {
    store: Arc<dyn KeyValueStore>,
}

impl RatingService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn all(&self) -> Result<Vec<Rating>> {
        self.store.get_json_or_default(keys::USER_RATINGS)
    }

    /// Record a rating of `user_id` written by `rated_by`
    ///
    /// A member cannot rate themselves, and rates a given ride at most once.
    pub fn rate(
        &self,
        user_id: &str,
        rated_by: &str,
        rating: u8,
        comment: &str,
        ride_id: &str,
    ) -> Result<Rating> {
        let entry = Rating {
            user_id: user_id.trim().to_string(),
            rated_by: rated_by.trim().to_string(),
            rating,
            comment: comment.trim().to_string(),
            ride_id: ride_id.trim().to_string(),
            created_at: Utc::now(),
        };
        entry.validate().map_err(Error::Validation)?;
        if entry.user_id == entry.rated_by {
            return Err(Error::validation("members cannot rate themselves"));
        }

        let mut ratings = self.all()?;
        let duplicate = !entry.ride_id.is_empty()
            && ratings.iter().any(|r| {
                r.rated_by == entry.rated_by && r.user_id == entry.user_id && r.ride_id == entry.ride_id
            });
        if duplicate {
            return Err(Error::validation("this ride was already rated"));
        }

        ratings.push(entry.clone());
        self.store.set_json(keys::USER_RATINGS, &ratings)?;
        Ok(entry)
    }

    /// Ratings received by `user_id`, newest first
    pub fn ratings_for(&self, user_id: &str) -> Result<Vec<Rating>> {
        let mut received: Vec<Rating> = self
            .all()?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        received.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(received)
    }

    pub fn stats(&self, user_id: &str) -> Result<RatingStats> {
        Ok(RatingStats::from_ratings(&self.ratings_for(user_id)?))
    }
}
