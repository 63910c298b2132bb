//! CLI command implementations

pub mod account;
pub mod admin;
pub mod chat;
pub mod demo;
pub mod logs;
pub mod prefs;
pub mod profile;
pub mod rating;
pub mod rides;
pub mod route;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use dialoguer::Password;

use carona_core::services::{EntryPoint, LogEvent, LoggingService};
use carona_core::{Account, CaronaContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_carona_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_carona_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CARONA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".carona"))
        .ok_or_else(|| anyhow!("Could not find home directory; set CARONA_DIR"))
}

/// Open the context for the current data directory
pub fn get_context() -> Result<CaronaContext> {
    let data_dir = get_carona_dir()?;
    CaronaContext::new(&data_dir).context("Failed to initialize carona context")
}

/// The logged-in account, or an error telling the user to log in
pub fn require_account(ctx: &CaronaContext) -> Result<Account> {
    ctx.accounts
        .current()
        .cloned()
        .ok_or_else(|| carona_core::Error::NoSession.into())
}

/// Use the given password or prompt for it without echo
pub fn read_password(password: Option<String>, prompt: &str) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(Password::new().with_prompt(prompt).interact()?),
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
