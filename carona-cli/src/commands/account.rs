//! Account commands - register, login, logout, whoami, toggle

use anyhow::{anyhow, Result};
use colored::Colorize;

use carona_core::{NewUserProfile, Occupation, ProfileKind};

use super::{get_context, print_json, read_password, require_account};
use crate::output;

/// Arguments of `carona register`
pub struct RegisterArgs {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub occupation: String,
    pub city: Option<String>,
    pub nationality: Option<String>,
    pub photo: Option<String>,
    pub document: Option<String>,
    pub password: Option<String>,
}

pub fn run_register(args: RegisterArgs, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let occupation: Occupation = args.occupation.parse().map_err(|e: String| anyhow!(e))?;

    let input = NewUserProfile {
        name: args.name,
        email: args.email,
        phone: args.phone,
        age: args.age,
        occupation,
        photo: args.photo,
        city: args.city,
        nationality: args.nationality,
        document: args.document,
    };
    // Validate before prompting so a bad form fails fast
    input.validate().map_err(carona_core::Error::Validation)?;
    let password = read_password(args.password, "Password")?;

    let account = ctx.accounts.register(input, &password)?;

    if json {
        return print_json(&account);
    }

    output::success(&format!("Registered {}", account.profile.email));
    if account.profile.needs_validation {
        output::warning("Your documents are pending review; you can log in once approved.");
    } else {
        println!("Run 'carona login {}' to start.", account.profile.email);
    }
    Ok(())
}

pub fn run_login(
    email: &str,
    password: Option<String>,
    driver: bool,
    passenger: bool,
    json: bool,
) -> Result<()> {
    let mut ctx = get_context()?;

    let wants_driver = if driver || passenger {
        driver
    } else {
        ctx.preferences.preferred_login_profile()? == Some(ProfileKind::Driver)
    };
    let password = read_password(password, "Password")?;
    let account = ctx.login(email, &password, wants_driver)?;

    if json {
        return print_json(&account);
    }

    output::success(&format!(
        "Logged in as {} ({})",
        account.profile.name,
        account.active_profile()
    ));
    Ok(())
}

pub fn run_logout() -> Result<()> {
    let mut ctx = get_context()?;
    if ctx.accounts.current().is_none() {
        output::info("Not logged in.");
        return Ok(());
    }
    ctx.logout()?;
    output::success("Logged out");
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let Some(account) = ctx.accounts.current() else {
        if json {
            return print_json(&serde_json::Value::Null);
        }
        output::info("Not logged in.");
        return Ok(());
    };

    if json {
        return print_json(account);
    }

    println!("{}", "Current account".bold());
    println!("{}", output::account_table(account));
    Ok(())
}

pub fn run_toggle(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_account(&ctx)?;

    let active = ctx.accounts.toggle_driver_mode()?;

    if json {
        return print_json(&serde_json::json!({ "activeProfile": active }));
    }
    output::success(&format!("Now using the {} profile", active));
    Ok(())
}
