use anyhow::Result;

use tally_core::service::Tracker;

use super::helpers::json_error;

pub(crate) fn cmd_goal_set(
    tracker: &Tracker,
    calories: f64,
    max: Option<f64>,
    json: bool,
) -> Result<()> {
    let settings = tracker.set_goal(calories, max)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        let goal = settings.daily_goal;
        match settings.daily_max {
            Some(m) => println!("Daily goal set: {goal:.0} kcal (hard max {m:.0} kcal)"),
            None => println!("Daily goal set: {goal:.0} kcal"),
        }
    }

    Ok(())
}

pub(crate) fn cmd_goal_show(tracker: &Tracker, json: bool) -> Result<()> {
    let settings = tracker.settings()?;

    if let Some(s) = settings {
        if json {
            println!("{}", serde_json::to_string_pretty(&s)?);
        } else {
            let goal = s.daily_goal;
            match s.daily_max {
                Some(m) => println!("Daily goal: {goal:.0} kcal (hard max {m:.0} kcal)"),
                None => println!("Daily goal: {goal:.0} kcal"),
            }
        }
    } else if json {
        println!("{}", json_error("No goal set"));
    } else {
        eprintln!("No goal set. Use `tally goal set <calories>` to set one.");
    }

    Ok(())
}
