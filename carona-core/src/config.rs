//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "demoMode": false, ... },
//!   ...
//! }
//! ```
//! Fields this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name of the main store
pub const STORE_FILE: &str = "carona.duckdb";
/// File name of the demo store
pub const DEMO_STORE_FILE: &str = "demo.duckdb";
/// Environment variable overriding the demo mode setting (for CI/testing)
pub const DEMO_MODE_ENV: &str = "CARONA_DEMO_MODE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Carona configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
}

impl Config {
    /// Load config from the data directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file (`carona demo on`)
    /// 2. Environment variable CARONA_DEMO_MODE
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        let demo_mode = match std::env::var(DEMO_MODE_ENV).ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        Ok(Self { demo_mode })
    }

    /// Save config to the data directory
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let mut settings = read_settings(data_dir)?;
        settings.app.demo_mode = self.demo_mode;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }

    /// Store file selected by the current mode
    pub fn store_file(&self) -> &'static str {
        if self.demo_mode {
            DEMO_STORE_FILE
        } else {
            STORE_FILE
        }
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}

/// Unreadable settings fall back to defaults rather than blocking startup
fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_settings_use_defaults() {
        let dir = tempdir().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        assert!(!raw.app.demo_mode);
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app":{"demoMode":false,"theme":"dark"},"lastRoute":"/menu"}"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.enable_demo_mode();
        config.save(dir.path()).unwrap();

        let raw = read_settings(dir.path()).unwrap();
        assert!(raw.app.demo_mode);
        assert_eq!(raw.app.other["theme"], "dark");
        assert_eq!(raw.other["lastRoute"], "/menu");
    }

    #[test]
    fn test_store_file_follows_mode() {
        let mut config = Config::default();
        assert_eq!(config.store_file(), STORE_FILE);
        config.enable_demo_mode();
        assert_eq!(config.store_file(), DEMO_STORE_FILE);
        config.disable_demo_mode();
        assert_eq!(config.store_file(), STORE_FILE);
    }
}
