//! Housekeeping passes over the stored collections.
//!
//! Earlier data layouts allowed multiple records per day (one per logging
//! action) and predated the goal snapshot fields. Both passes here are
//! idempotent and safe to run on every startup.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{ActivityEntry, CalorieEntry, Settings, new_entry_id};

/// Compact history to one record per past day. Today's records are left
/// untouched and in original order, since today may still receive further
/// same-day appends.
#[must_use]
pub fn consolidate_past_days(
    entries: Vec<CalorieEntry>,
    activities: Vec<ActivityEntry>,
    today: NaiveDate,
) -> (Vec<CalorieEntry>, Vec<ActivityEntry>) {
    let entries = consolidate_by_date(entries, today, |e| e.date, |group| {
        let total: f64 = group.iter().map(|e| e.calories).sum();
        let mut merged = earliest(group, |e| e.timestamp);
        merged.id = new_entry_id();
        merged.calories = total;
        merged
    });
    let activities = consolidate_by_date(activities, today, |a| a.date, |group| {
        let total: f64 = group.iter().map(|a| a.calories_burned).sum();
        let mut merged = earliest(group, |a| a.timestamp);
        merged.id = new_entry_id();
        merged.calories_burned = total;
        merged
    });
    (entries, activities)
}

/// Group records by date in first-seen order; past dates with more than one
/// record collapse to the `merge` result, everything else passes through
/// unchanged.
fn consolidate_by_date<T>(
    records: Vec<T>,
    today: NaiveDate,
    date_of: impl Fn(&T) -> NaiveDate,
    merge: impl Fn(Vec<T>) -> T,
) -> Vec<T> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut groups: HashMap<NaiveDate, Vec<T>> = HashMap::new();
    for record in records {
        let date = date_of(&record);
        if !groups.contains_key(&date) {
            order.push(date);
        }
        groups.entry(date).or_default().push(record);
    }

    let mut out = Vec::new();
    for date in order {
        let Some(group) = groups.remove(&date) else {
            continue;
        };
        if date == today || group.len() == 1 {
            out.extend(group);
        } else {
            out.push(merge(group));
        }
    }
    out
}

/// Take the record with the smallest key out of a non-empty group,
/// preserving "first occurred" semantics for the merged result.
fn earliest<T, K: Ord>(mut group: Vec<T>, key: impl Fn(&T) -> K) -> T {
    group.sort_by_key(&key);
    group.swap_remove(0)
}

/// Stamp the current settings onto every calorie entry still missing a
/// goal snapshot. Returns the count stamped so callers can skip the write
/// when nothing changed. Without settings this is a no-op, never an error.
#[must_use]
pub fn backfill_goal_snapshots(
    mut entries: Vec<CalorieEntry>,
    settings: Option<&Settings>,
) -> (Vec<CalorieEntry>, usize) {
    let Some(settings) = settings else {
        return (entries, 0);
    };

    let mut stamped = 0;
    for entry in &mut entries {
        if !entry.has_snapshot() {
            entry.daily_goal = settings.daily_goal;
            entry.daily_max = settings.daily_max;
            stamped += 1;
        }
    }
    (entries, stamped)
}
