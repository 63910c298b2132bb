//! Role-specific profiles: driver (vehicle + documents) and passenger

use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Oldest vehicle model year accepted by driver setup
pub const MIN_VEHICLE_YEAR: i32 = 1950;

/// Vehicle registered by a driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    /// Normalized to uppercase without separators
    pub plate: String,
    pub color: String,
}

impl Vehicle {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        plate: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into().trim().to_string(),
            model: model.into().trim().to_string(),
            year,
            plate: normalize_plate(&plate.into()),
            color: color.into().trim().to_string(),
        }
    }

    /// Validate vehicle data
    ///
    /// Plates follow the Brazilian formats: the old `ABC1234` and the
    /// Mercosul `ABC1D23`.
    pub fn validate(&self) -> Result<(), String> {
        if self.brand.is_empty() {
            return Err("vehicle brand cannot be empty".to_string());
        }
        if self.model.is_empty() {
            return Err("vehicle model cannot be empty".to_string());
        }
        if self.color.is_empty() {
            return Err("vehicle color cannot be empty".to_string());
        }
        let max_year = Utc::now().year() + 1;
        if !(MIN_VEHICLE_YEAR..=max_year).contains(&self.year) {
            return Err(format!(
                "vehicle year must be between {} and {}",
                MIN_VEHICLE_YEAR, max_year
            ));
        }
        if !is_valid_plate(&self.plate) {
            return Err(format!("invalid license plate: {}", self.plate));
        }
        Ok(())
    }
}

/// Short human label, e.g. "Honda Civic Prata"
impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.brand, self.model, self.color)
    }
}

/// Driver role data, persisted under `driver_<id>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub vehicle: Vehicle,
    /// Filename of the driver's license (CNH) photo
    pub license_document: String,
    /// Filename of the vehicle registration (CRLV) photo
    pub registration_document: String,
}

impl DriverProfile {
    pub fn validate(&self) -> Result<(), String> {
        self.vehicle.validate()?;
        if self.license_document.trim().is_empty() {
            return Err("driver's license document is required".to_string());
        }
        if self.registration_document.trim().is_empty() {
            return Err("vehicle registration document is required".to_string());
        }
        Ok(())
    }
}

/// Passenger role data, persisted under `passenger_<id>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerProfile {
    /// Favorite route ids, in the order they were saved
    #[serde(default)]
    pub favorite_routes: Vec<String>,
}

/// Uppercase and strip separators from a plate
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn is_valid_plate(plate: &str) -> bool {
    static PLATE: OnceLock<Regex> = OnceLock::new();
    let re = PLATE.get_or_init(|| {
        Regex::new(r"^[A-Z]{3}[0-9][A-Z0-9][0-9]{2}$").expect("plate pattern is valid")
    });
    re.is_match(plate)
}
