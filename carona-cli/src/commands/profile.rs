//! Profile commands - view and edit the profile, register as a driver

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use carona_core::{ProfileUpdate, Vehicle};

use super::{get_context, print_json, require_account};
use crate::output;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the logged-in member's profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit contact details; pass an empty value to clear an optional field
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        photo: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        nationality: Option<String>,
    },
}

pub fn run(command: Option<ProfileCommands>) -> Result<()> {
    let mut ctx = get_context()?;
    let account = require_account(&ctx)?;

    match command.unwrap_or(ProfileCommands::Show { json: false }) {
        ProfileCommands::Show { json } => {
            if json {
                return print_json(&account);
            }
            println!("{}", "Profile".bold());
            println!("{}", output::account_table(&account));

            let routes = ctx.routes.list(account.id())?;
            if !routes.is_empty() {
                println!();
                println!("{}", "Favorite routes".bold());
                for route in routes {
                    println!("  {}: {} -> {}", route.name, route.departure, route.destination);
                }
            }
            Ok(())
        }
        ProfileCommands::Edit {
            name,
            phone,
            photo,
            city,
            nationality,
        } => {
            let update = ProfileUpdate {
                name,
                phone,
                photo,
                city,
                nationality,
            };
            let updated = ctx.accounts.update_profile(&update)?;
            output::success(&format!("Profile of {} updated", updated.profile.name));
            Ok(())
        }
    }
}

/// Arguments of `carona driver-setup`
pub struct DriverSetupArgs {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub color: String,
    pub license: String,
    pub registration: String,
}

pub fn run_driver_setup(args: DriverSetupArgs, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_account(&ctx)?;

    let vehicle = Vehicle::new(args.brand, args.model, args.year, args.plate, args.color);
    let account = ctx
        .accounts
        .create_driver_profile(vehicle, &args.license, &args.registration)?;

    if json {
        return print_json(&account);
    }

    output::success("Driver profile saved; the driver profile is now active");
    if let Some(driver) = &account.driver_profile {
        println!("  Vehicle: {} ({})", driver.vehicle, driver.vehicle.plate);
    }
    Ok(())
}
