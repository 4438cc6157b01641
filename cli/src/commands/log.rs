use anyhow::Result;
use std::process;

use tally_core::service::Tracker;

use super::helpers::{json_error, parse_date};

pub(crate) fn cmd_log(
    tracker: &Tracker,
    calories: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;

    let Some(entry) = tracker.log_calories(date, calories)? else {
        if json {
            println!("{}", json_error("No goal set"));
        } else {
            eprintln!("No goal set. Use `tally goal set <calories>` first.");
        }
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let total = entry.calories;
        println!("Logged {calories:.0} kcal for {date} — day total {total:.0} kcal");
    }

    Ok(())
}

pub(crate) fn cmd_correct(
    tracker: &Tracker,
    calories: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;

    let Some(entry) = tracker.correct_calories(date, calories)? else {
        if json {
            println!("{}", json_error("No goal set"));
        } else {
            eprintln!("No goal set. Use `tally goal set <calories>` first.");
        }
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let total = entry.calories;
        println!("Corrected {date} to {total:.0} kcal");
    }

    Ok(())
}
