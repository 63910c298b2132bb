//! Favorite route commands

use anyhow::Result;
use clap::Subcommand;

use carona_core::RideKind;

use super::rides::{trip_input, TripArgs};
use super::{get_context, print_json, require_account};
use crate::output;

#[derive(Subcommand)]
pub enum RouteCommands {
    /// Save a route you take often
    Add {
        /// Short label, e.g. "Home to campus"
        name: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// List saved routes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved route
    Delete { id: String },
    /// Post a ride request along a saved route
    Use {
        id: String,
        /// Departure time, HH:MM
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "1")]
        seats: u32,
        #[arg(long)]
        share_fuel: bool,
    },
}

pub fn run(command: RouteCommands) -> Result<()> {
    let mut ctx = get_context()?;
    let account = require_account(&ctx)?;

    match command {
        RouteCommands::Add { name, from, to } => {
            let route = ctx.routes.add(account.id(), &name, &from, &to)?;
            output::success(&format!("Saved route '{}' ({})", route.name, route.id));
        }
        RouteCommands::List { json } => {
            let routes = ctx.routes.list(account.id())?;
            if json {
                return print_json(&routes);
            }
            if routes.is_empty() {
                println!("No favorite routes yet. Add one with 'carona route add'.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "From", "To"]);
            for route in &routes {
                table.add_row(vec![
                    route.id.as_str(),
                    route.name.as_str(),
                    route.departure.as_str(),
                    route.destination.as_str(),
                ]);
            }
            println!("{}", table);
        }
        RouteCommands::Delete { id } => {
            if ctx.routes.delete(account.id(), &id)? {
                output::success(&format!("Deleted route {}", id));
            } else {
                output::warning(&format!("No route with id {}", id));
            }
        }
        RouteCommands::Use {
            id,
            time,
            seats,
            share_fuel,
        } => {
            let Some(route) = ctx.routes.get(account.id(), &id)? else {
                let missing = carona_core::Error::not_found(format!("no route with id {}", id));
                return Err(missing.into());
            };
            let trip = TripArgs {
                time,
                from: route.departure,
                to: route.destination,
                seats,
                share_fuel,
                description: None,
            };
            let kind = RideKind::Request {
                requested_seats: seats,
            };
            let input = trip_input(&ctx, &account, trip, None, kind)?;
            let Some(ride) = ctx.rides()?.add_request(input)? else {
                return Err(carona_core::Error::NoSession.into());
            };
            output::success(&format!("Request {} posted from route '{}'", ride.id, route.name));
        }
    }

    Ok(())
}
