//! Persisted key layout
//!
//! Global keys are shared by every account; the rest are namespaced by an
//! account id (or a ride id for chats).

pub const REGISTERED_USERS: &str = "registeredUsers";
pub const USER_EMAILS: &str = "userEmails";
pub const USER_PASSWORDS: &str = "userPasswords";
pub const CURRENT_USER_ID: &str = "currentUserId";
pub const CURRENT_USER: &str = "currentUser";
pub const USER_RATINGS: &str = "userRatings";
pub const SKIP_USER_TYPE_SELECTION: &str = "skipUserTypeSelection";
pub const DEFAULT_USER_TYPE: &str = "defaultUserType";

/// Prefixes of the per-account live ride collections
pub const RIDES_PREFIX: &str = "rides_";
pub const REQUESTS_PREFIX: &str = "requests_";

pub fn user(id: &str) -> String {
    format!("user_{}", id)
}

pub fn driver(id: &str) -> String {
    format!("driver_{}", id)
}

pub fn passenger(id: &str) -> String {
    format!("passenger_{}", id)
}

pub fn active_profile(id: &str) -> String {
    format!("activeProfile_{}", id)
}

pub fn rides(id: &str) -> String {
    format!("{}{}", RIDES_PREFIX, id)
}

pub fn requests(id: &str) -> String {
    format!("{}{}", REQUESTS_PREFIX, id)
}

pub fn ride_history(id: &str) -> String {
    format!("rideHistory_{}", id)
}

pub fn favorite_routes(id: &str) -> String {
    format!("favoriteRoutes_{}", id)
}

pub fn chat(ride_id: &str) -> String {
    format!("chat_{}", ride_id)
}
