//! Carona CLI - university ride sharing in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use carona_core::services::LogEvent;
use commands::{account, admin, chat, demo, logs, prefs, profile, rating, rides, route};

/// Carona - ride sharing for the university community
#[derive(Parser)]
#[command(name = "carona", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        age: u32,
        /// student, professor, staff or contractor
        #[arg(long, default_value = "student")]
        occupation: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        nationality: Option<String>,
        /// Photo URI
        #[arg(long)]
        photo: Option<String>,
        /// Identity document URI, required for contractors
        #[arg(long)]
        document: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "CARONA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and start a session
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "CARONA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Log in with the driver profile
        #[arg(long, conflicts_with = "passenger")]
        driver: bool,
        /// Log in with the passenger profile
        #[arg(long)]
        passenger: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the current session
    Logout,

    /// Show the logged-in account
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Switch between the driver and passenger profiles
    Toggle {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a vehicle and become a driver
    DriverSetup {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        plate: String,
        #[arg(long)]
        color: String,
        /// Driver's license document URI
        #[arg(long)]
        license: String,
        /// Vehicle registration document URI
        #[arg(long)]
        registration: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: Option<profile::ProfileCommands>,
    },

    /// Manage ride offers
    Ride {
        #[command(subcommand)]
        command: rides::RideCommands,
    },

    /// Manage ride requests
    Request {
        #[command(subcommand)]
        command: rides::RequestCommands,
    },

    /// Show requests (as driver) or offers (as passenger) that are still open
    Board {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show completed and cancelled rides with totals
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage favorite routes
    Route {
        #[command(subcommand)]
        command: route::RouteCommands,
    },

    /// Rate another member
    Rate {
        /// Member id or email
        member: String,
        /// 1 to 5
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        stars: u8,
        #[arg(long)]
        comment: Option<String>,
        /// Ride the rating refers to
        #[arg(long)]
        ride: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show ratings received by a member (yourself by default)
    Ratings {
        /// Member id or email
        member: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Talk about a ride
    Chat {
        #[command(subcommand)]
        command: chat::ChatCommands,
    },

    /// Login preferences
    Prefs {
        #[command(subcommand)]
        command: Option<prefs::PrefsCommands>,
    },

    /// Member registry and document review
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage the usage log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Name recorded in the usage log; never carries arguments
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Toggle { .. } => "toggle",
            Commands::DriverSetup { .. } => "driver-setup",
            Commands::Profile { .. } => "profile",
            Commands::Ride { .. } => "ride",
            Commands::Request { .. } => "request",
            Commands::Board { .. } => "board",
            Commands::History { .. } => "history",
            Commands::Route { .. } => "route",
            Commands::Rate { .. } => "rate",
            Commands::Ratings { .. } => "ratings",
            Commands::Chat { .. } => "chat",
            Commands::Prefs { .. } => "prefs",
            Commands::Admin { .. } => "admin",
            Commands::Demo { .. } => "demo",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.name();
    let logger = commands::get_logger();

    let result = run(cli);

    match result {
        Ok(()) => {
            commands::log_event(
                &logger,
                LogEvent::new("command_executed").with_command(command),
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let kind = e
                .downcast_ref::<carona_core::Error>()
                .map(|err| err.kind())
                .unwrap_or("internal");
            commands::log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(command)
                    .with_error_kind(kind),
            );
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register {
            name,
            email,
            phone,
            age,
            occupation,
            city,
            nationality,
            photo,
            document,
            password,
            json,
        } => account::run_register(
            account::RegisterArgs {
                name,
                email,
                phone,
                age,
                occupation,
                city,
                nationality,
                photo,
                document,
                password,
            },
            json,
        ),
        Commands::Login {
            email,
            password,
            driver,
            passenger,
            json,
        } => account::run_login(&email, password, driver, passenger, json),
        Commands::Logout => account::run_logout(),
        Commands::Whoami { json } => account::run_whoami(json),
        Commands::Toggle { json } => account::run_toggle(json),
        Commands::DriverSetup {
            brand,
            model,
            year,
            plate,
            color,
            license,
            registration,
            json,
        } => profile::run_driver_setup(
            profile::DriverSetupArgs {
                brand,
                model,
                year,
                plate,
                color,
                license,
                registration,
            },
            json,
        ),
        Commands::Profile { command } => profile::run(command),
        Commands::Ride { command } => rides::run_ride(command),
        Commands::Request { command } => rides::run_request(command),
        Commands::Board { json } => rides::run_board(json),
        Commands::History { json } => rides::run_history(json),
        Commands::Route { command } => route::run(command),
        Commands::Rate {
            member,
            stars,
            comment,
            ride,
            json,
        } => rating::run_rate(&member, stars, comment, ride, json),
        Commands::Ratings { member, json } => rating::run_ratings(member, json),
        Commands::Chat { command } => chat::run(command),
        Commands::Prefs { command } => prefs::run(command),
        Commands::Admin { command } => admin::run(command),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ride_offer() {
        let cli = Cli::try_parse_from([
            "carona", "ride", "offer", "--time", "07:30", "--from", "Centro", "--to", "Campus I",
            "--seats", "3", "--price", "5.50",
        ])
        .unwrap();
        assert_eq!(cli.command.name(), "ride");
    }

    #[test]
    fn test_rate_rejects_out_of_range_stars() {
        assert!(Cli::try_parse_from(["carona", "rate", "someone", "6"]).is_err());
        assert!(Cli::try_parse_from(["carona", "rate", "someone", "5"]).is_ok());
    }

    #[test]
    fn test_login_flags_conflict() {
        assert!(
            Cli::try_parse_from(["carona", "login", "a@b.com", "--driver", "--passenger"]).is_err()
        );
    }
}
