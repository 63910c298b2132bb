//! Account domain model - a session around a registered member

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::driver::{DriverProfile, PassengerProfile};
use super::user::UserProfile;

/// The two roles a member can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Driver,
    Passenger,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Driver => "driver",
            ProfileKind::Passenger => "passenger",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            ProfileKind::Driver => ProfileKind::Passenger,
            ProfileKind::Passenger => ProfileKind::Driver,
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driver" | "motorista" => Ok(ProfileKind::Driver),
            "passenger" | "passageiro" => Ok(ProfileKind::Passenger),
            other => Err(format!("unknown profile: {}", other)),
        }
    }
}

/// Runtime session object: the profile plus whichever role is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub is_driver: bool,
    pub has_driver_profile: bool,
    pub has_passenger_profile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_profile: Option<DriverProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_profile: Option<PassengerProfile>,
}

impl Account {
    /// Assemble an account from its persisted parts
    ///
    /// The role flags are derived from which sub-records exist; `active`
    /// falls back to whichever side is present.
    pub fn assemble(
        profile: UserProfile,
        driver_profile: Option<DriverProfile>,
        passenger_profile: Option<PassengerProfile>,
        active: ProfileKind,
    ) -> Self {
        let has_driver_profile = driver_profile.is_some();
        let has_passenger_profile = passenger_profile.is_some();
        let is_driver = match active {
            ProfileKind::Driver => has_driver_profile,
            ProfileKind::Passenger => !has_passenger_profile && has_driver_profile,
        };

        Self {
            profile,
            is_driver,
            has_driver_profile,
            has_passenger_profile,
            driver_profile,
            passenger_profile,
        }
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn active_profile(&self) -> ProfileKind {
        if self.is_driver {
            ProfileKind::Driver
        } else {
            ProfileKind::Passenger
        }
    }

    pub fn has_profile(&self, kind: ProfileKind) -> bool {
        match kind {
            ProfileKind::Driver => self.has_driver_profile,
            ProfileKind::Passenger => self.has_passenger_profile,
        }
    }
}
