//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod chat;
mod driver;
pub mod rating;
pub mod result;
pub mod ride;
mod route;
pub mod token;
pub mod user;

pub use account::{Account, ProfileKind};
pub use chat::ChatMessage;
pub use driver::{DriverProfile, PassengerProfile, Vehicle};
pub use rating::{Rating, RatingStats};
pub use ride::{HistoryStats, Ride, RideInput, RideKind, RideStatus, UserSnapshot};
pub use route::FavoriteRoute;
pub use user::{NewUserProfile, Occupation, ProfileUpdate, UserProfile, ValidationStatus};
