use anyhow::Result;

use tally_core::service::Tracker;

pub(crate) fn cmd_maintain(tracker: &Tracker, json: bool) -> Result<()> {
    let summary = tracker.run_maintenance()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.is_noop() {
        println!("Nothing to do — store is already compact.");
    } else {
        let merged = summary.calorie_entries_merged;
        let activities = summary.activity_entries_merged;
        let stamped = summary.snapshots_backfilled;
        println!(
            "Merged {merged} calorie and {activities} activity record(s); backfilled {stamped} goal snapshot(s)"
        );
    }

    Ok(())
}
