//! Login preference commands

use anyhow::{anyhow, Result};
use clap::Subcommand;

use carona_core::ProfileKind;

use super::{get_context, print_json};
use crate::output;

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show the stored login preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log in with a default profile without asking
    Set {
        /// driver or passenger
        #[arg(long)]
        default: String,
        /// Keep asking for the profile on login
        #[arg(long)]
        ask: bool,
    },
    /// Forget the default profile
    Clear,
}

pub fn run(command: Option<PrefsCommands>) -> Result<()> {
    let ctx = get_context()?;
    let prefs = &ctx.preferences;

    match command.unwrap_or(PrefsCommands::Show { json: false }) {
        PrefsCommands::Show { json } => {
            let default = prefs.default_user_type()?;
            let skip = prefs.skip_user_type_selection()?;
            if json {
                return print_json(&serde_json::json!({
                    "defaultUserType": default,
                    "skipUserTypeSelection": skip,
                }));
            }
            println!(
                "Default profile: {}",
                default.map(|k| k.to_string()).unwrap_or_else(|| "-".to_string())
            );
            println!("Skip profile choice: {}", if skip { "yes" } else { "no" });
        }
        PrefsCommands::Set { default, ask } => {
            let kind: ProfileKind = default.parse().map_err(|e: String| anyhow!(e))?;
            prefs.set_default_user_type(Some(kind), !ask)?;
            output::success(&format!("Default profile set to {}", kind));
        }
        PrefsCommands::Clear => {
            prefs.set_default_user_type(None, false)?;
            output::success("Login preferences cleared");
        }
    }

    Ok(())
}
