//! Registry administration - list members, review contractor documents

use anyhow::Result;
use clap::Subcommand;

use carona_core::ValidationStatus;

use super::{get_context, print_json};
use crate::output;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List every registered member
    Users {
        /// Only members waiting for review
        #[arg(long)]
        pending: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Approve a contracted worker's documents
    Approve { id: String },
    /// Reject a contracted worker's documents
    Reject { id: String },
}

pub fn run(command: AdminCommands) -> Result<()> {
    let mut ctx = get_context()?;

    match command {
        AdminCommands::Users { pending, json } => {
            let users: Vec<_> = ctx
                .accounts
                .list_accounts()?
                .into_iter()
                .filter(|u| !pending || u.validation_status == ValidationStatus::Pending)
                .collect();
            if json {
                return print_json(&users);
            }
            if users.is_empty() {
                println!("No members found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Email", "Occupation", "Validation"]);
            for user in &users {
                table.add_row(vec![
                    user.id.clone(),
                    user.name.clone(),
                    user.email.clone(),
                    user.occupation.to_string(),
                    user.validation_status.to_string(),
                ]);
            }
            println!("{}", table);
        }
        AdminCommands::Approve { id } => {
            let profile = ctx
                .accounts
                .set_validation_status(&id, ValidationStatus::Approved)?;
            output::success(&format!("{} can now log in", profile.name));
        }
        AdminCommands::Reject { id } => {
            let profile = ctx
                .accounts
                .set_validation_status(&id, ValidationStatus::Rejected)?;
            output::warning(&format!("Documents of {} rejected", profile.name));
        }
    }

    Ok(())
}
