//! Rating commands

use anyhow::Result;
use colored::Colorize;

use carona_core::{CaronaContext, UserProfile};

use super::{get_context, print_json, require_account};
use crate::output;

/// Resolve a member given either an id or an email address
fn resolve_member(ctx: &CaronaContext, member: &str) -> Result<UserProfile> {
    let found = if member.contains('@') {
        ctx.accounts.find_by_email(member)?
    } else {
        ctx.accounts.get_profile(member)?
    };
    found.ok_or_else(|| carona_core::Error::UserNotFound(member.to_string()).into())
}

pub fn run_rate(
    member: &str,
    stars: u8,
    comment: Option<String>,
    ride: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let account = require_account(&ctx)?;
    let rated = resolve_member(&ctx, member)?;

    let rating = ctx.ratings.rate(
        &rated.id,
        account.id(),
        stars,
        comment.as_deref().unwrap_or_default(),
        ride.as_deref().unwrap_or_default(),
    )?;

    if json {
        return print_json(&rating);
    }
    output::success(&format!("Rated {} with {} stars", rated.name, rating.rating));
    Ok(())
}

pub fn run_ratings(member: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let profile = match member {
        Some(member) => resolve_member(&ctx, &member)?,
        None => require_account(&ctx)?.profile,
    };

    let ratings = ctx.ratings.ratings_for(&profile.id)?;
    let stats = ctx.ratings.stats(&profile.id)?;

    if json {
        return print_json(&serde_json::json!({
            "user": profile.id,
            "ratings": ratings,
            "stats": stats,
        }));
    }

    println!(
        "{} {:.1} ({} ratings)",
        format!("Ratings for {}:", profile.name).bold(),
        stats.average_rating,
        stats.total_ratings
    );
    for (stars, count) in stats.rating_distribution.iter().rev() {
        println!("  {} {}", "*".repeat(*stars as usize), count);
    }

    if ratings.is_empty() {
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Stars", "Comment", "Ride", "Date"]);
    for rating in &ratings {
        table.add_row(vec![
            rating.rating.to_string(),
            rating.comment.clone(),
            rating.ride_id.clone(),
            rating.created_at.format("%Y-%m-%d").to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
