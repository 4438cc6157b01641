use anyhow::{Result, bail};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tally_core::service::Tracker;

use super::helpers::{no_neg_zero, parse_date};

const LBS_PER_KG: f64 = 2.20462;
const KG_PER_LB: f64 = 0.453_592;

pub(crate) fn cmd_weight_log(
    tracker: &Tracker,
    value: f64,
    unit: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    if value <= 0.0 {
        bail!("Weight must be greater than 0");
    }

    let weight_kg = match unit.to_lowercase().as_str() {
        "kg" => value,
        "lbs" | "lb" => {
            let kg = no_neg_zero(value * KG_PER_LB);
            eprintln!("Converting {value:.1} lbs → {kg:.2} kg");
            kg
        }
        _ => bail!("Invalid unit '{unit}'. Use 'kg' or 'lbs'"),
    };

    let date = parse_date(date)?;
    let entry = tracker.log_weight(date, weight_kg)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let lbs = entry.weight_kg * LBS_PER_KG;
        println!(
            "Logged {:.1} kg ({:.1} lbs) for {}",
            entry.weight_kg, lbs, entry.date
        );
    }

    Ok(())
}

pub(crate) fn cmd_weight_show(tracker: &Tracker, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let entry = tracker.weight_on(date)?;

    if let Some(e) = entry {
        if json {
            println!("{}", serde_json::to_string_pretty(&e)?);
        } else {
            let lbs = e.weight_kg * LBS_PER_KG;
            println!("{}: {:.1} kg ({:.1} lbs)", e.date, e.weight_kg, lbs);
        }
    } else {
        let date_str = date.format("%Y-%m-%d");
        if json {
            println!(
                "{}",
                serde_json::json!({ "error": format!("No weight entry for {date_str}") })
            );
        } else {
            eprintln!("No weight entry for {date_str}");
        }
    }

    Ok(())
}

pub(crate) fn cmd_weight_history(
    tracker: &Tracker,
    days: Option<usize>,
    json: bool,
) -> Result<()> {
    let entries = tracker.weight_history(days)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        eprintln!("No weight entries found. Use `tally weight log` to record your weight.");
    } else {
        #[derive(Tabled)]
        struct WeightRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Weight (kg)")]
            kg: String,
            #[tabled(rename = "Weight (lbs)")]
            lbs: String,
        }

        let rows: Vec<WeightRow> = entries
            .iter()
            .map(|e| WeightRow {
                date: e.date.format("%Y-%m-%d").to_string(),
                kg: format!("{:.1}", e.weight_kg),
                lbs: format!("{:.1}", e.weight_kg * LBS_PER_KG),
            })
            .collect();

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
            .to_string();
        println!("{table}");
    }

    Ok(())
}
