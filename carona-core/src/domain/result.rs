//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::account::ProfileKind;
use super::user::ValidationStatus;

/// Core library error type
///
/// Expected failures (duplicate email, wrong password, missing profile) are
/// ordinary variants so callers match on them instead of parsing messages.
#[derive(Error, Debug)]
pub enum Error {
    #[error("An account with email {0} is already registered")]
    DuplicateEmail(String),

    #[error("No account registered for {0}")]
    UserNotFound(String),

    #[error("Wrong password")]
    WrongPassword,

    #[error("Account validation is {0}; login is allowed once it is approved")]
    PendingValidation(ValidationStatus),

    #[error("Account has no {0} profile")]
    MissingProfile(ProfileKind),

    #[error("No active session")]
    NoSession,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable, data-free name of the error variant.
    ///
    /// Used by the event log, which must never record emails or other
    /// user-provided text.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::DuplicateEmail(_) => "duplicate_email",
            Error::UserNotFound(_) => "user_not_found",
            Error::WrongPassword => "wrong_password",
            Error::PendingValidation(_) => "pending_validation",
            Error::MissingProfile(_) => "missing_profile",
            Error::NoSession => "no_session",
            Error::Validation(_) => "validation",
            Error::NotFound(_) => "not_found",
            Error::Storage(_) => "storage",
            Error::Credential(_) => "credential",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{:#}", err))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            context: None,
        }
    }

    /// Create a successful result with context
    pub fn ok_with_context(data: T, context: HashMap<String, serde_json::Value>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            context: Some(context),
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            error_kind: None,
            context: None,
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                let mut failed = Self::fail(e.to_string());
                failed.error_kind = Some(e.kind().to_string());
                failed
            }
        }
    }
}
