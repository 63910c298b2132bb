//! User profile domain model

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum and maximum accepted ages at registration
pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 120;

/// University occupation of a member.
///
/// Stored with the Portuguese labels the mobile app wrote to local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupation {
    #[serde(rename = "aluno")]
    Student,
    #[serde(rename = "professor")]
    Professor,
    #[serde(rename = "funcionario")]
    Staff,
    #[serde(rename = "terceirizado")]
    Contractor,
}

impl Occupation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occupation::Student => "aluno",
            Occupation::Professor => "professor",
            Occupation::Staff => "funcionario",
            Occupation::Contractor => "terceirizado",
        }
    }

    /// Contracted workers must be approved before they can log in
    pub fn needs_validation(&self) -> bool {
        matches!(self, Occupation::Contractor)
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occupation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aluno" | "aluna" | "student" => Ok(Occupation::Student),
            "professor" | "professora" => Ok(Occupation::Professor),
            "funcionario" | "funcionário" | "staff" => Ok(Occupation::Staff),
            "terceirizado" | "terceirizada" | "contractor" => Ok(Occupation::Contractor),
            other => Err(format!("unknown occupation: {}", other)),
        }
    }
}

/// Review state of an account that needs validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Approved => "approved",
            ValidationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ValidationStatus::Pending),
            "approved" => Ok(ValidationStatus::Approved),
            "rejected" => Ok(ValidationStatus::Rejected),
            other => Err(format!("unknown validation status: {}", other)),
        }
    }
}

/// Registered member identity, as persisted under `user_<id>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub occupation: Occupation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// Filename of the attached proof of employment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub needs_validation: bool,
    pub is_validated: bool,
    pub validation_status: ValidationStatus,
}

impl UserProfile {
    /// Build a profile for a new registration, deriving the validation
    /// fields from the occupation.
    pub fn from_registration(id: impl Into<String>, input: NewUserProfile) -> Self {
        let needs_validation = input.occupation.needs_validation();
        let validation_status = if needs_validation {
            ValidationStatus::Pending
        } else {
            ValidationStatus::Approved
        };

        Self {
            id: id.into(),
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            phone: input.phone.trim().to_string(),
            age: input.age,
            occupation: input.occupation,
            photo: input.photo,
            city: input.city,
            nationality: input.nationality,
            document: input.document,
            needs_validation,
            is_validated: !needs_validation,
            validation_status,
        }
    }

    /// Whether this member may start a session
    pub fn can_login(&self) -> bool {
        !self.needs_validation || self.validation_status == ValidationStatus::Approved
    }

    /// Record the outcome of an external review
    pub fn set_validation_status(&mut self, status: ValidationStatus) {
        self.validation_status = status;
        self.is_validated = status == ValidationStatus::Approved;
    }

    /// Apply editable fields from the profile page
    pub fn apply_update(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(phone) = &update.phone {
            self.phone = phone.trim().to_string();
        }
        if let Some(photo) = &update.photo {
            self.photo = non_empty(photo);
        }
        if let Some(city) = &update.city {
            self.city = non_empty(city);
        }
        if let Some(nationality) = &update.nationality {
            self.nationality = non_empty(nationality);
        }
    }
}

/// Registration form input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub occupation: Occupation,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
}

impl NewUserProfile {
    /// Validate registration input
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if !is_valid_email(&self.email) {
            return Err(format!("invalid email address: {}", self.email.trim()));
        }
        if self.phone.trim().is_empty() {
            return Err("phone cannot be empty".to_string());
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(format!("age must be between {} and {}", MIN_AGE, MAX_AGE));
        }
        if self.occupation.needs_validation()
            && self.document.as_deref().map_or(true, |d| d.trim().is_empty())
        {
            return Err("contracted workers must attach a proof of employment".to_string());
        }
        Ok(())
    }
}

/// Editable profile fields; `None` leaves a field unchanged and an empty
/// string clears an optional one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub city: Option<String>,
    pub nationality: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name cannot be empty".to_string());
        }
        if self.phone.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err("phone cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Normalize an email for registry lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    });
    re.is_match(email.trim())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(occupation: Occupation) -> NewUserProfile {
        NewUserProfile {
            name: "Ana Costa".to_string(),
            email: " Ana@UFPB.br ".to_string(),
            phone: "(83) 99999-0000".to_string(),
            age: 21,
            occupation,
            photo: None,
            city: Some("João Pessoa".to_string()),
            nationality: None,
            document: None,
        }
    }

    #[test]
    fn test_student_is_approved_immediately() {
        let profile = UserProfile::from_registration("u1", input(Occupation::Student));
        assert!(!profile.needs_validation);
        assert!(profile.is_validated);
        assert_eq!(profile.validation_status, ValidationStatus::Approved);
        assert_eq!(profile.email, "ana@ufpb.br");
    }

    #[test]
    fn test_contractor_starts_pending() {
        let mut data = input(Occupation::Contractor);
        data.document = Some("contrato.pdf".to_string());
        let profile = UserProfile::from_registration("u2", data);
        assert!(profile.needs_validation);
        assert!(!profile.is_validated);
        assert_eq!(profile.validation_status, ValidationStatus::Pending);
        assert!(!profile.can_login());
    }

    #[test]
    fn test_contractor_requires_document() {
        let data = input(Occupation::Contractor);
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_registration_validation() {
        assert!(input(Occupation::Professor).validate().is_ok());

        let mut bad_email = input(Occupation::Student);
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut too_young = input(Occupation::Student);
        too_young.age = 12;
        assert!(too_young.validate().is_err());
    }

    #[test]
    fn test_occupation_parsing_and_serde() {
        assert_eq!("aluno".parse::<Occupation>().unwrap(), Occupation::Student);
        assert_eq!("Funcionário".parse::<Occupation>().unwrap(), Occupation::Staff);
        assert!("astronauta".parse::<Occupation>().is_err());
        assert_eq!(
            serde_json::to_string(&Occupation::Contractor).unwrap(),
            "\"terceirizado\""
        );
    }

    #[test]
    fn test_validation_status_keeps_flag_in_sync() {
        let mut data = input(Occupation::Contractor);
        data.document = Some("contrato.pdf".to_string());
        let mut profile = UserProfile::from_registration("u3", data);

        profile.set_validation_status(ValidationStatus::Approved);
        assert!(profile.is_validated);
        assert!(profile.can_login());

        profile.set_validation_status(ValidationStatus::Rejected);
        assert!(!profile.is_validated);
        assert!(!profile.can_login());
    }

    #[test]
    fn test_profile_update_clears_optional_fields() {
        let mut profile = UserProfile::from_registration("u4", input(Occupation::Student));
        profile.apply_update(&ProfileUpdate {
            city: Some("".to_string()),
            nationality: Some("Brasileira".to_string()),
            ..Default::default()
        });
        assert_eq!(profile.city, None);
        assert_eq!(profile.nationality.as_deref(), Some("Brasileira"));
    }
}
