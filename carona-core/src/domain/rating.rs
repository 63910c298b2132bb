//! Rating domain model

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// One member's rating of another after a ride, stored in `userRatings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Member being rated
    pub user_id: String,
    /// Member who wrote the rating
    pub rated_by: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub ride_id: String,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            ));
        }
        if self.user_id.trim().is_empty() {
            return Err("rated user is required".to_string());
        }
        Ok(())
    }
}

/// Aggregate of a member's ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_ratings: usize,
    /// Count per star value, always with keys 1 through 5
    pub rating_distribution: BTreeMap<u8, usize>,
}

impl RatingStats {
    pub fn from_ratings<'a>(ratings: impl IntoIterator<Item = &'a Rating>) -> Self {
        let mut distribution: BTreeMap<u8, usize> =
            (MIN_RATING..=MAX_RATING).map(|star| (star, 0)).collect();
        let mut total = 0usize;
        let mut sum = 0u64;

        for rating in ratings {
            if let Some(count) = distribution.get_mut(&rating.rating) {
                *count += 1;
                total += 1;
                sum += u64::from(rating.rating);
            }
        }

        let average_rating = if total == 0 {
            0.0
        } else {
            sum as f64 / total as f64
        };

        Self {
            average_rating,
            total_ratings: total,
            rating_distribution: distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(stars: u8) -> Rating {
        Rating {
            user_id: "u1".to_string(),
            rated_by: "u2".to_string(),
            rating: stars,
            comment: String::new(),
            ride_id: "r1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_stats_empty() {
        let stats = RatingStats::from_ratings(&[]);
        assert_eq!(stats.total_ratings, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.rating_distribution.len(), 5);
    }

    #[test]
    fn test_stats_average_and_distribution() {
        let ratings = vec![rating(5), rating(4), rating(5), rating(1)];
        let stats = RatingStats::from_ratings(&ratings);
        assert_eq!(stats.total_ratings, 4);
        assert!((stats.average_rating - 3.75).abs() < f64::EPSILON);
        assert_eq!(stats.rating_distribution[&5], 2);
        assert_eq!(stats.rating_distribution[&3], 0);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(rating(0).validate().is_err());
        assert!(rating(6).validate().is_err());
        assert!(rating(3).validate().is_ok());
    }
}
