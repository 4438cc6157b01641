use anyhow::Result;

use tally_core::service::Tracker;

use super::helpers::parse_date;

pub(crate) fn cmd_activity_log(
    tracker: &Tracker,
    calories: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let entry = tracker.log_activity(date, calories)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let total = entry.calories_burned;
        println!("Burned {calories:.0} kcal for {date} — day total {total:.0} kcal");
    }

    Ok(())
}

pub(crate) fn cmd_activity_correct(
    tracker: &Tracker,
    calories: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let entry = tracker.correct_activity(date, calories)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let total = entry.calories_burned;
        println!("Corrected {date} to {total:.0} kcal burned");
    }

    Ok(())
}
