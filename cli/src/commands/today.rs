use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tally_core::models::{DailyTotals, today};
use tally_core::service::Tracker;

use super::helpers::no_neg_zero;

fn print_totals_block(totals: &DailyTotals) {
    let consumed = totals.consumed;
    let burned = totals.burned;
    let net = no_neg_zero(totals.net);
    println!("  CONSUMED: {consumed:.0} kcal");
    println!("  BURNED: {burned:.0} kcal");
    println!("  NET: {net:.0} kcal");

    let goal = totals.daily_goal;
    match totals.daily_max {
        Some(max) => println!("  GOAL: {goal:.0} kcal (hard max {max:.0})"),
        None => println!("  GOAL: {goal:.0} kcal"),
    }
    let remaining = no_neg_zero(totals.remaining);
    println!("  REMAINING: {remaining:.0} kcal");
}

pub(crate) fn cmd_today(tracker: &Tracker, json: bool) -> Result<()> {
    let totals = tracker.today_totals()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(());
    }

    let date = today();
    println!("=== {date} ===\n");
    print_totals_block(&totals);

    Ok(())
}

pub(crate) fn cmd_history(tracker: &Tracker, days: Option<usize>, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Consumed")]
        consumed: String,
        #[tabled(rename = "Burned")]
        burned: String,
        #[tabled(rename = "Net")]
        net: String,
        #[tabled(rename = "Goal")]
        goal: String,
        #[tabled(rename = "Remaining")]
        remaining: String,
    }

    let totals = tracker.daily_totals()?;

    // Newest first
    let mut days_desc: Vec<_> = totals.into_iter().collect();
    days_desc.reverse();
    if let Some(n) = days {
        days_desc.truncate(n);
    }

    if json {
        let ordered: Vec<serde_json::Value> = days_desc
            .iter()
            .map(|(date, t)| {
                let mut obj = serde_json::to_value(t)?;
                if let Some(map) = obj.as_object_mut() {
                    map.insert(
                        "date".to_string(),
                        serde_json::Value::String(date.to_string()),
                    );
                }
                Ok(obj)
            })
            .collect::<Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&ordered)?);
        return Ok(());
    }

    if days_desc.is_empty() {
        eprintln!("No entries yet. Use `tally log` to get started.");
        process::exit(2);
    }

    let rows: Vec<HistoryRow> = days_desc
        .iter()
        .map(|(date, t)| HistoryRow {
            date: date.to_string(),
            consumed: format!("{:.0}", t.consumed),
            burned: format!("{:.0}", t.burned),
            net: format!("{:.0}", no_neg_zero(t.net)),
            goal: match t.daily_max {
                Some(max) => format!("{:.0}/{max:.0}", t.daily_goal),
                None => format!("{:.0}", t.daily_goal),
            },
            remaining: format!("{:.0}", no_neg_zero(t.remaining)),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
