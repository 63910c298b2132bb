//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;

use carona_core::{Account, Ride, RideKind, RideStatus};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Price in reais, e.g. "R$ 5,00"
pub fn format_price(price: Option<Decimal>) -> String {
    match price {
        Some(price) => format!("R$ {}", price.round_dp(2)).replace('.', ","),
        None => "-".to_string(),
    }
}

fn format_status(status: RideStatus) -> String {
    match status {
        RideStatus::Active => status.to_string().green().to_string(),
        RideStatus::Completed => status.to_string().cyan().to_string(),
        RideStatus::Cancelled => status.to_string().red().to_string(),
    }
}

/// Table of offers and requests
pub fn ride_table<'a>(rides: impl IntoIterator<Item = &'a Ride>) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        "ID", "Kind", "Time", "From", "To", "Seats", "Price", "Member", "Status",
    ]);

    for ride in rides {
        let kind = match &ride.kind {
            RideKind::Offer { vehicle: Some(vehicle), .. } => format!("offer ({})", vehicle),
            RideKind::Offer { .. } => "offer".to_string(),
            RideKind::Request { .. } => "request".to_string(),
        };
        table.add_row(vec![
            ride.id.clone(),
            kind,
            ride.time.clone(),
            ride.departure.clone(),
            ride.destination.clone(),
            ride.seats().to_string(),
            format_price(ride.price),
            format!("{} ({:.1})", ride.user.name, ride.user.rating),
            format_status(ride.status),
        ]);
    }

    table
}

/// Vertical summary of an account
pub fn account_table(account: &Account) -> Table {
    let profile = &account.profile;
    let mut table = create_table();

    table.add_row(vec!["ID", profile.id.as_str()]);
    table.add_row(vec!["Name", profile.name.as_str()]);
    table.add_row(vec!["Email", profile.email.as_str()]);
    table.add_row(vec!["Phone", profile.phone.as_str()]);
    table.add_row(vec!["Age".to_string(), profile.age.to_string()]);
    table.add_row(vec!["Occupation".to_string(), profile.occupation.to_string()]);
    if let Some(city) = &profile.city {
        table.add_row(vec!["City", city.as_str()]);
    }
    if let Some(nationality) = &profile.nationality {
        table.add_row(vec!["Nationality", nationality.as_str()]);
    }
    table.add_row(vec![
        "Validation".to_string(),
        profile.validation_status.to_string(),
    ]);
    table.add_row(vec![
        "Active profile".to_string(),
        account.active_profile().to_string(),
    ]);
    let roles = match (account.has_driver_profile, account.has_passenger_profile) {
        (true, true) => "driver, passenger",
        (true, false) => "driver",
        (false, true) => "passenger",
        (false, false) => "-",
    };
    table.add_row(vec!["Profiles", roles]);
    if let Some(driver) = &account.driver_profile {
        table.add_row(vec![
            "Vehicle".to_string(),
            format!("{} {} ({})", driver.vehicle, driver.vehicle.year, driver.vehicle.plate),
        ]);
    }

    table
}
