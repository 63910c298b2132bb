//! Ride chat commands

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{get_context, print_json, require_account};
use crate::output;

#[derive(Subcommand)]
pub enum ChatCommands {
    /// Send a message in a ride's conversation
    Send { ride: String, text: String },
    /// Show a ride's conversation and mark it read
    Show {
        ride: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ChatCommands) -> Result<()> {
    let ctx = get_context()?;
    let account = require_account(&ctx)?;

    match command {
        ChatCommands::Send { ride, text } => {
            let message = ctx.chat.send(&ride, account.id(), &text)?;
            output::success(&format!("Sent at {}", message.sent_at.format("%H:%M")));
        }
        ChatCommands::Show { ride, json } => {
            let messages = ctx.chat.messages(&ride)?;
            ctx.chat.mark_read(&ride, account.id())?;

            if json {
                return print_json(&messages);
            }
            if messages.is_empty() {
                println!("No messages for ride {}.", ride);
                return Ok(());
            }

            for message in &messages {
                let sender = if message.sender_id == account.id() {
                    "you".to_string()
                } else {
                    ctx.accounts
                        .get_profile(&message.sender_id)?
                        .map(|p| p.name)
                        .unwrap_or_else(|| message.sender_id.clone())
                };
                let line = format!(
                    "[{}] {}: {}",
                    message.sent_at.format("%d/%m %H:%M"),
                    sender,
                    message.text
                );
                if message.sender_id != account.id() && !message.is_read {
                    println!("{}", line.bold());
                } else {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
