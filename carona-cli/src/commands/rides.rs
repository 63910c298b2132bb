//! Ride commands - offers, requests, the ride board and history

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;

use carona_core::{
    Account, CaronaContext, ProfileKind, RideInput, RideKind, RideStatus, UserSnapshot,
};

use super::{get_context, print_json, require_account};
use crate::output;

/// Fields shared by offers and requests
#[derive(Args)]
pub struct TripArgs {
    /// Departure time, HH:MM
    #[arg(long)]
    pub time: String,
    /// Departure place
    #[arg(long)]
    pub from: String,
    /// Destination
    #[arg(long)]
    pub to: String,
    /// Seats offered or needed
    #[arg(long, default_value = "1")]
    pub seats: u32,
    /// Split fuel costs
    #[arg(long)]
    pub share_fuel: bool,
    /// Free-form notes
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand)]
pub enum RideCommands {
    /// Offer a ride as a driver
    Offer {
        #[command(flatten)]
        trip: TripArgs,
        /// Price per seat in reais
        #[arg(long)]
        price: Option<Decimal>,
        /// Accept small detours
        #[arg(long)]
        allow_detour: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List your offers
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark an offer as completed
    Complete { id: String },
    /// Cancel an offer
    Cancel { id: String },
    /// Find offers and requests by place
    Search {
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum RequestCommands {
    /// Ask for a ride as a passenger
    New {
        #[command(flatten)]
        trip: TripArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List your requests
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a request as completed
    Complete { id: String },
    /// Cancel a request
    Cancel { id: String },
}

/// Denormalized view of the poster stored with each ride
pub fn snapshot_of(ctx: &CaronaContext, account: &Account) -> Result<UserSnapshot> {
    let stats = ctx.ratings.stats(account.id())?;
    Ok(UserSnapshot {
        name: account.profile.name.clone(),
        photo: account.profile.photo.clone().unwrap_or_default(),
        rating: stats.average_rating,
        occupation: account.profile.occupation,
    })
}

/// Build ride input for the logged-in member
pub fn trip_input(
    ctx: &CaronaContext,
    account: &Account,
    trip: TripArgs,
    price: Option<Decimal>,
    kind: RideKind,
) -> Result<RideInput> {
    Ok(RideInput {
        user: snapshot_of(ctx, account)?,
        time: trip.time,
        departure: trip.from,
        destination: trip.to,
        price,
        share_fuel: trip.share_fuel,
        description: trip.description,
        kind,
    })
}

fn not_found(id: &str) -> anyhow::Error {
    anyhow!(carona_core::Error::not_found(format!("no ride with id {}", id)))
}

pub fn run_ride(command: RideCommands) -> Result<()> {
    let mut ctx = get_context()?;
    let account = require_account(&ctx)?;

    match command {
        RideCommands::Offer {
            trip,
            price,
            allow_detour,
            json,
        } => {
            if !account.is_driver {
                return Err(carona_core::Error::MissingProfile(ProfileKind::Driver).into());
            }
            let vehicle = account
                .driver_profile
                .as_ref()
                .map(|driver| driver.vehicle.to_string());
            let kind = RideKind::Offer {
                available_seats: trip.seats,
                vehicle,
                allow_detour,
            };
            let input = trip_input(&ctx, &account, trip, price, kind)?;
            let Some(ride) = ctx.rides()?.add_ride(input)? else {
                return Err(carona_core::Error::NoSession.into());
            };

            if json {
                return print_json(&ride);
            }
            output::success(&format!("Ride {} posted", ride.id));
            println!("{}", output::ride_table([&ride]));
        }
        RideCommands::List { json } => {
            let rides = ctx.rides()?.rides();
            if json {
                return print_json(rides);
            }
            if rides.is_empty() {
                println!("No rides offered yet.");
            } else {
                println!("{}", output::ride_table(rides));
            }
        }
        RideCommands::Complete { id } => {
            if !ctx.rides()?.update_status(&id, RideStatus::Completed)? {
                return Err(not_found(&id));
            }
            output::success(&format!("Ride {} completed and added to history", id));
        }
        RideCommands::Cancel { id } => {
            if !ctx.rides()?.cancel_ride(&id)? {
                return Err(not_found(&id));
            }
            output::warning(&format!("Ride {} cancelled", id));
        }
        RideCommands::Search { query, json } => {
            let found = ctx.rides()?.search(&query)?;
            if json {
                return print_json(&found);
            }
            if found.is_empty() {
                println!("Nothing matches '{}'.", query);
            } else {
                println!("{}", output::ride_table(&found));
            }
        }
    }

    Ok(())
}

pub fn run_request(command: RequestCommands) -> Result<()> {
    let mut ctx = get_context()?;
    let account = require_account(&ctx)?;

    match command {
        RequestCommands::New { trip, json } => {
            let kind = RideKind::Request {
                requested_seats: trip.seats,
            };
            let input = trip_input(&ctx, &account, trip, None, kind)?;
            let Some(ride) = ctx.rides()?.add_request(input)? else {
                return Err(carona_core::Error::NoSession.into());
            };

            if json {
                return print_json(&ride);
            }
            output::success(&format!("Request {} posted", ride.id));
            println!("{}", output::ride_table([&ride]));
        }
        RequestCommands::List { json } => {
            let requests = ctx.rides()?.requests();
            if json {
                return print_json(requests);
            }
            if requests.is_empty() {
                println!("No ride requests yet.");
            } else {
                println!("{}", output::ride_table(requests));
            }
        }
        RequestCommands::Complete { id } => {
            if !ctx.rides()?.update_status(&id, RideStatus::Completed)? {
                return Err(not_found(&id));
            }
            output::success(&format!("Request {} completed and added to history", id));
        }
        RequestCommands::Cancel { id } => {
            if !ctx.rides()?.cancel_request(&id)? {
                return Err(not_found(&id));
            }
            output::warning(&format!("Request {} cancelled", id));
        }
    }

    Ok(())
}

/// Show what the active side is looking for
pub fn run_board(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let account = require_account(&ctx)?;
    let viewer = account.active_profile();
    let board = ctx.rides()?.board(viewer)?;

    if json {
        return print_json(&board);
    }

    let title = match viewer {
        ProfileKind::Driver => "Passengers looking for a ride",
        ProfileKind::Passenger => "Rides available",
    };
    println!("{}", title.bold());
    if board.is_empty() {
        println!("Nothing here right now.");
    } else {
        println!("{}", output::ride_table(&board));
    }
    Ok(())
}

pub fn run_history(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_account(&ctx)?;
    let rides = ctx.rides()?;
    let stats = rides.history_stats();

    if json {
        return print_json(&serde_json::json!({
            "history": rides.history(),
            "stats": stats,
        }));
    }

    println!("{}", "Ride history".bold());
    let mut table = output::create_table();
    table.add_row(vec!["Completed rides".to_string(), stats.total_rides.to_string()]);
    table.add_row(vec![
        "Passengers".to_string(),
        stats.total_passengers.to_string(),
    ]);
    table.add_row(vec![
        "Total".to_string(),
        output::format_price(Some(stats.total_earnings)),
    ]);
    println!("{}", table);

    if !rides.history().is_empty() {
        println!("{}", output::ride_table(rides.history()));
    }
    Ok(())
}
