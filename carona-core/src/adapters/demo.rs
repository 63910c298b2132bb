//! Demo data for demo mode
//!
//! The sample member, rides, requests and history entry shown by the
//! mobile app before any real data exists.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    NewUserProfile, Occupation, Ride, RideKind, RideStatus, UserSnapshot, Vehicle,
};

/// Credentials of the seeded demo member
pub const DEMO_EMAIL: &str = "demo@carona.app";
pub const DEMO_PASSWORD: &str = "carona123";

/// Owner of the sample offers and requests posted by other members
pub const DEMO_COMMUNITY_ID: &str = "demo-community";

/// Registration input for the demo member
pub fn demo_member() -> NewUserProfile {
    NewUserProfile {
        name: "João Silva".to_string(),
        email: DEMO_EMAIL.to_string(),
        phone: "(83) 99999-9999".to_string(),
        age: 22,
        occupation: Occupation::Student,
        photo: None,
        city: Some("João Pessoa".to_string()),
        nationality: Some("Brasileiro".to_string()),
        document: None,
    }
}

/// Vehicle used for the demo member's driver profile
pub fn demo_vehicle() -> Vehicle {
    Vehicle::new("Honda", "Civic", 2019, "QFX1A23", "Prata")
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn snapshot(name: &str, rating: f64, occupation: Occupation) -> UserSnapshot {
    UserSnapshot {
        name: name.to_string(),
        photo: String::new(),
        rating,
        occupation,
    }
}

#[allow(clippy::too_many_arguments)]
fn ride(
    id: &str,
    user: UserSnapshot,
    time: &str,
    destination: &str,
    price: Option<i64>,
    share_fuel: bool,
    status: RideStatus,
    created_at: DateTime<Utc>,
    kind: RideKind,
) -> Ride {
    Ride {
        id: id.to_string(),
        user,
        time: time.to_string(),
        departure: "CI - Centro de Informática".to_string(),
        destination: destination.to_string(),
        price: price.map(|p| Decimal::new(p, 0)),
        share_fuel,
        description: None,
        status,
        created_at,
        kind,
    }
}

/// Sample driver offers, newest first
pub fn demo_rides() -> Vec<Ride> {
    vec![
        ride(
            "1001",
            snapshot("João Santos", 4.8, Occupation::Student),
            "18:00",
            "Manaíra Shopping",
            Some(5),
            true,
            RideStatus::Active,
            date(2024, 1, 15),
            RideKind::Offer {
                available_seats: 3,
                vehicle: Some("Honda Civic Prata".to_string()),
                allow_detour: false,
            },
        ),
        ride(
            "1002",
            snapshot("Maria Silva", 4.9, Occupation::Professor),
            "19:30",
            "Cabo Branco",
            Some(8),
            true,
            RideStatus::Active,
            date(2024, 1, 14),
            RideKind::Offer {
                available_seats: 2,
                vehicle: Some("Toyota Corolla Branco".to_string()),
                allow_detour: false,
            },
        ),
    ]
}

/// Sample passenger requests, newest first
pub fn demo_requests() -> Vec<Ride> {
    vec![
        ride(
            "2001",
            snapshot("Ana Costa", 4.7, Occupation::Student),
            "17:00",
            "Bessa",
            None,
            true,
            RideStatus::Active,
            date(2024, 1, 16),
            RideKind::Request { requested_seats: 1 },
        ),
        ride(
            "2002",
            snapshot("Pedro Lima", 4.6, Occupation::Staff),
            "19:00",
            "Tambaú",
            None,
            false,
            RideStatus::Active,
            date(2024, 1, 15),
            RideKind::Request { requested_seats: 2 },
        ),
    ]
}

/// Sample completed ride
pub fn demo_history() -> Vec<Ride> {
    vec![ride(
        "h1",
        snapshot("Carlos Mendes", 4.9, Occupation::Professor),
        "08:00",
        "Shopping Tambaú",
        Some(6),
        true,
        RideStatus::Completed,
        date(2024, 1, 10),
        RideKind::Offer {
            available_seats: 3,
            vehicle: None,
            allow_detour: false,
        },
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_ids_do_not_collide() {
        let ids: HashSet<String> = demo_rides()
            .into_iter()
            .chain(demo_requests())
            .chain(demo_history())
            .map(|r| r.id)
            .collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_demo_member_is_valid() {
        assert!(demo_member().validate().is_ok());
        assert!(demo_vehicle().validate().is_ok());
    }

    #[test]
    fn test_demo_collections_are_newest_first() {
        let rides = demo_rides();
        assert!(rides[0].created_at > rides[1].created_at);
        assert!(demo_requests().iter().all(|r| !r.is_offer()));
    }
}
