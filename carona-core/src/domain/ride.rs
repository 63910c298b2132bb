//! Ride domain model - driver offers and passenger requests

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::token::new_token;
use super::user::Occupation;

/// Upper bound on seats offered or requested in one ride
pub const MAX_SEATS: u32 = 8;

/// Lifecycle state of a ride
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Active,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Active => "active",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }

    /// Transitions only leave `active`; completed and cancelled are final.
    pub fn can_transition_to(&self, next: RideStatus) -> bool {
        matches!(
            (self, next),
            (RideStatus::Active, RideStatus::Completed) | (RideStatus::Active, RideStatus::Cancelled)
        )
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(RideStatus::Active),
            "completed" => Ok(RideStatus::Completed),
            "cancelled" | "canceled" => Ok(RideStatus::Cancelled),
            other => Err(format!("unknown ride status: {}", other)),
        }
    }
}

/// Denormalized view of the member who posted the ride
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub name: String,
    #[serde(default)]
    pub photo: String,
    pub rating: f64,
    pub occupation: Occupation,
}

/// Offer or request, with the fields that only make sense for each
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RideKind {
    Offer {
        #[serde(rename = "availableSeats")]
        available_seats: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vehicle: Option<String>,
        #[serde(rename = "allowDetour", default)]
        allow_detour: bool,
    },
    Request {
        #[serde(rename = "requestedSeats")]
        requested_seats: u32,
    },
}

impl RideKind {
    pub fn seats(&self) -> u32 {
        match self {
            RideKind::Offer { available_seats, .. } => *available_seats,
            RideKind::Request { requested_seats } => *requested_seats,
        }
    }

    pub fn is_offer(&self) -> bool {
        matches!(self, RideKind::Offer { .. })
    }
}

/// A ride as stored in `rides_<id>`, `requests_<id>` and `rideHistory_<id>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: String,
    pub user: UserSnapshot,
    /// Departure clock time, "HH:MM"
    pub time: String,
    pub departure: String,
    pub destination: String,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    pub share_fuel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: RideKind,
}

impl Ride {
    /// Create an active ride from form input, stamping id and creation time
    pub fn from_input(input: RideInput) -> Self {
        Self {
            id: new_token(),
            user: input.user,
            time: input.time.trim().to_string(),
            departure: input.departure.trim().to_string(),
            destination: input.destination.trim().to_string(),
            price: input.price,
            share_fuel: input.share_fuel,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            status: RideStatus::Active,
            created_at: Utc::now(),
            kind: input.kind,
        }
    }

    pub fn seats(&self) -> u32 {
        self.kind.seats()
    }

    pub fn is_offer(&self) -> bool {
        self.kind.is_offer()
    }

    /// Case-insensitive match on departure or destination
    pub fn matches_place(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.departure.to_lowercase().contains(&query)
            || self.destination.to_lowercase().contains(&query)
    }
}

/// Offer/request form input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideInput {
    pub user: UserSnapshot,
    pub time: String,
    pub departure: String,
    pub destination: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub share_fuel: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: RideKind,
}

impl RideInput {
    /// Validate form input
    pub fn validate(&self) -> Result<(), String> {
        if NaiveTime::parse_from_str(self.time.trim(), "%H:%M").is_err() {
            return Err(format!("invalid time (expected HH:MM): {}", self.time));
        }
        if self.departure.trim().is_empty() {
            return Err("departure cannot be empty".to_string());
        }
        if self.destination.trim().is_empty() {
            return Err("destination cannot be empty".to_string());
        }
        let seats = self.kind.seats();
        if seats == 0 || seats > MAX_SEATS {
            return Err(format!("seats must be between 1 and {}", MAX_SEATS));
        }
        if self.price.is_some_and(|p| p.is_sign_negative()) {
            return Err("price cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Totals shown on the history page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_rides: usize,
    pub total_passengers: u32,
    pub total_earnings: Decimal,
}

impl HistoryStats {
    /// Aggregate over completed entries only
    pub fn from_history(history: &[Ride]) -> Self {
        history
            .iter()
            .filter(|ride| ride.status == RideStatus::Completed)
            .fold(HistoryStats::default(), |mut stats, ride| {
                stats.total_rides += 1;
                stats.total_passengers += ride.seats();
                stats.total_earnings += ride.price.unwrap_or_default();
                stats
            })
    }
}
