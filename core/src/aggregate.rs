//! Pure transformations over record collections.
//!
//! Collections move in and move out; the caller persists the returned
//! value. `now` and `today` arrive as parameters so everything here stays
//! deterministic under test.
//!
//! "Log" operations are additive, "correct" operations replace. The two are
//! deliberately separate functions, never one overloaded with a mode flag.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    ActivityEntry, CalorieEntry, DailyTotals, Settings, WeightEntry, new_entry_id,
};

/// Additive upsert for calorie intake: increment the day's entry or create
/// it. An existing goal snapshot is preserved; only an absent one is
/// stamped from the current settings.
#[must_use]
pub fn add_calories(
    mut entries: Vec<CalorieEntry>,
    date: NaiveDate,
    calories: f64,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<CalorieEntry> {
    if let Some(entry) = entries.iter_mut().find(|e| e.date == date) {
        entry.calories += calories;
        entry.timestamp = now;
        if !entry.has_snapshot() {
            entry.daily_goal = settings.daily_goal;
            entry.daily_max = settings.daily_max;
        }
    } else {
        entries.push(CalorieEntry {
            id: new_entry_id(),
            date,
            calories,
            daily_goal: settings.daily_goal,
            daily_max: settings.daily_max,
            timestamp: now,
        });
    }
    entries
}

/// Absolute replacement for corrections. Creating a missing entry needs
/// settings for the snapshot; without them the collection is returned
/// unchanged.
#[must_use]
pub fn set_calories(
    mut entries: Vec<CalorieEntry>,
    date: NaiveDate,
    calories: f64,
    settings: Option<&Settings>,
    now: DateTime<Utc>,
) -> Vec<CalorieEntry> {
    if let Some(entry) = entries.iter_mut().find(|e| e.date == date) {
        entry.calories = calories;
        entry.timestamp = now;
        if !entry.has_snapshot() {
            if let Some(s) = settings {
                entry.daily_goal = s.daily_goal;
                entry.daily_max = s.daily_max;
            }
        }
    } else if let Some(s) = settings {
        entries.push(CalorieEntry {
            id: new_entry_id(),
            date,
            calories,
            daily_goal: s.daily_goal,
            daily_max: s.daily_max,
            timestamp: now,
        });
    }
    entries
}

/// Additive upsert for calories burned.
#[must_use]
pub fn add_burned(
    mut activities: Vec<ActivityEntry>,
    date: NaiveDate,
    burned: f64,
    now: DateTime<Utc>,
) -> Vec<ActivityEntry> {
    if let Some(activity) = activities.iter_mut().find(|a| a.date == date) {
        activity.calories_burned += burned;
        activity.timestamp = now;
    } else {
        activities.push(ActivityEntry {
            id: new_entry_id(),
            date,
            calories_burned: burned,
            timestamp: now,
        });
    }
    activities
}

/// Absolute replacement for activity corrections.
#[must_use]
pub fn set_burned(
    mut activities: Vec<ActivityEntry>,
    date: NaiveDate,
    burned: f64,
    now: DateTime<Utc>,
) -> Vec<ActivityEntry> {
    if let Some(activity) = activities.iter_mut().find(|a| a.date == date) {
        activity.calories_burned = burned;
        activity.timestamp = now;
    } else {
        activities.push(ActivityEntry {
            id: new_entry_id(),
            date,
            calories_burned: burned,
            timestamp: now,
        });
    }
    activities
}

/// Replacement upsert for weight. Weight is a point measurement, so a
/// second log on the same date overwrites rather than accumulates.
#[must_use]
pub fn set_weight(
    mut weights: Vec<WeightEntry>,
    date: NaiveDate,
    weight_kg: f64,
    now: DateTime<Utc>,
) -> Vec<WeightEntry> {
    if let Some(weight) = weights.iter_mut().find(|w| w.date == date) {
        weight.weight_kg = weight_kg;
        weight.timestamp = now;
    } else {
        weights.push(WeightEntry {
            id: new_entry_id(),
            date,
            weight_kg,
            timestamp: now,
        });
    }
    weights
}

/// Fold the collections into totals for `today`.
///
/// Goal and max come from the today-entry's snapshot when present, else the
/// live settings, else zero/absent.
#[must_use]
pub fn today_totals(
    entries: &[CalorieEntry],
    activities: &[ActivityEntry],
    settings: Option<&Settings>,
    today: NaiveDate,
) -> DailyTotals {
    let entry = entries.iter().find(|e| e.date == today);
    let activity = activities.iter().find(|a| a.date == today);

    let consumed = entry.map_or(0.0, |e| e.calories);
    let burned = activity.map_or(0.0, |a| a.calories_burned);
    let (daily_goal, daily_max) = match entry {
        Some(e) => (goal_for(e, settings), max_for(e, settings)),
        None => (live_goal(settings), live_max(settings)),
    };

    DailyTotals::compute(consumed, burned, daily_goal, daily_max)
}

/// Fold the collections into one totals row per date appearing in either
/// collection. Dates with no records simply have no key.
#[must_use]
pub fn daily_totals(
    entries: &[CalorieEntry],
    activities: &[ActivityEntry],
    settings: Option<&Settings>,
) -> BTreeMap<NaiveDate, DailyTotals> {
    struct DayAccum {
        consumed: f64,
        burned: f64,
        daily_goal: f64,
        daily_max: Option<f64>,
    }

    let mut days: BTreeMap<NaiveDate, DayAccum> = BTreeMap::new();

    for entry in entries {
        days.insert(
            entry.date,
            DayAccum {
                consumed: entry.calories,
                burned: 0.0,
                daily_goal: goal_for(entry, settings),
                daily_max: max_for(entry, settings),
            },
        );
    }

    for activity in activities {
        let day = days.entry(activity.date).or_insert_with(|| DayAccum {
            consumed: 0.0,
            burned: 0.0,
            daily_goal: live_goal(settings),
            daily_max: live_max(settings),
        });
        day.burned = activity.calories_burned;
    }

    days.into_iter()
        .map(|(date, day)| {
            let totals =
                DailyTotals::compute(day.consumed, day.burned, day.daily_goal, day.daily_max);
            (date, totals)
        })
        .collect()
}

fn goal_for(entry: &CalorieEntry, settings: Option<&Settings>) -> f64 {
    if entry.has_snapshot() {
        entry.daily_goal
    } else {
        live_goal(settings)
    }
}

fn max_for(entry: &CalorieEntry, settings: Option<&Settings>) -> Option<f64> {
    entry.daily_max.or_else(|| live_max(settings))
}

fn live_goal(settings: Option<&Settings>) -> f64 {
    settings.map_or(0.0, |s| s.daily_goal)
}

fn live_max(settings: Option<&Settings>) -> Option<f64> {
    settings.and_then(|s| s.daily_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings() -> Settings {
        Settings {
            daily_goal: 2000.0,
            daily_max: Some(2200.0),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_add_calories_accumulates_into_one_entry() {
        let s = settings();
        let entries = add_calories(Vec::new(), date(1), 500.0, &s, at(8));
        let entries = add_calories(entries, date(1), 800.0, &s, at(12));

        assert_eq!(entries.len(), 1);
        assert!((entries[0].calories - 1300.0).abs() < f64::EPSILON);
        assert_eq!(entries[0].timestamp, at(12));
    }

    #[test]
    fn test_add_calories_negative_delta() {
        let s = settings();
        let entries = add_calories(Vec::new(), date(1), 500.0, &s, at(8));
        let entries = add_calories(entries, date(1), -200.0, &s, at(9));
        assert!((entries[0].calories - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_calories_separate_dates_separate_entries() {
        let s = settings();
        let entries = add_calories(Vec::new(), date(1), 500.0, &s, at(8));
        let entries = add_calories(entries, date(2), 600.0, &s, at(8));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_add_calories_preserves_existing_snapshot() {
        let s = settings();
        let entries = add_calories(Vec::new(), date(1), 500.0, &s, at(8));

        let changed = Settings {
            daily_goal: 1800.0,
            daily_max: None,
            ..s
        };
        let entries = add_calories(entries, date(1), 100.0, &changed, at(9));

        assert!((entries[0].daily_goal - 2000.0).abs() < f64::EPSILON);
        assert_eq!(entries[0].daily_max, Some(2200.0));
    }

    #[test]
    fn test_add_calories_stamps_absent_snapshot() {
        let s = settings();
        let mut entries = add_calories(Vec::new(), date(1), 500.0, &s, at(8));
        entries[0].daily_goal = 0.0;
        entries[0].daily_max = None;

        let entries = add_calories(entries, date(1), 100.0, &s, at(9));
        assert!((entries[0].daily_goal - 2000.0).abs() < f64::EPSILON);
        assert_eq!(entries[0].daily_max, Some(2200.0));
    }

    #[test]
    fn test_set_calories_replaces_amount() {
        let s = settings();
        let entries = add_calories(Vec::new(), date(1), 500.0, &s, at(8));
        let entries = set_calories(entries, date(1), 1200.0, Some(&s), at(9));

        assert_eq!(entries.len(), 1);
        assert!((entries[0].calories - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_calories_creates_when_settings_present() {
        let s = settings();
        let entries = set_calories(Vec::new(), date(1), 700.0, Some(&s), at(8));
        assert_eq!(entries.len(), 1);
        assert!((entries[0].daily_goal - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_calories_noop_without_settings() {
        let entries = set_calories(Vec::new(), date(1), 700.0, None, at(8));
        assert!(entries.is_empty());
    }

    #[test]
    fn test_add_burned_accumulates() {
        let activities = add_burned(Vec::new(), date(1), 200.0, at(8));
        let activities = add_burned(activities, date(1), 100.0, at(9));
        assert_eq!(activities.len(), 1);
        assert!((activities[0].calories_burned - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_burned_replaces() {
        let activities = add_burned(Vec::new(), date(1), 200.0, at(8));
        let activities = set_burned(activities, date(1), 150.0, at(9));
        assert!((activities[0].calories_burned - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_weight_replaces_same_day() {
        let weights = set_weight(Vec::new(), date(1), 80.0, at(8));
        let weights = set_weight(weights, date(1), 79.5, at(20));

        assert_eq!(weights.len(), 1);
        assert!((weights[0].weight_kg - 79.5).abs() < f64::EPSILON);
        assert_eq!(weights[0].timestamp, at(20));
    }

    #[test]
    fn test_today_totals_worked_example() {
        // Goal 2000, max 2200; log 500 then 800; burn 300.
        let s = settings();
        let entries = add_calories(Vec::new(), date(1), 500.0, &s, at(8));
        let entries = add_calories(entries, date(1), 800.0, &s, at(12));
        let activities = add_burned(Vec::new(), date(1), 300.0, at(13));

        let totals = today_totals(&entries, &activities, Some(&s), date(1));
        assert!((totals.consumed - 1300.0).abs() < f64::EPSILON);
        assert!((totals.burned - 300.0).abs() < f64::EPSILON);
        assert!((totals.net - 1000.0).abs() < f64::EPSILON);
        assert!((totals.daily_goal - 2000.0).abs() < f64::EPSILON);
        assert_eq!(totals.daily_max, Some(2200.0));
        // 2200 - 1300 + 300 = 1200
        assert!((totals.remaining - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_today_totals_empty_collections() {
        let totals = today_totals(&[], &[], None, date(1));
        assert!(totals.consumed.abs() < f64::EPSILON);
        assert!(totals.burned.abs() < f64::EPSILON);
        assert!(totals.daily_goal.abs() < f64::EPSILON);
        assert!(totals.daily_max.is_none());
    }

    #[test]
    fn test_today_totals_falls_back_to_live_settings() {
        let s = settings();
        let activities = add_burned(Vec::new(), date(1), 250.0, at(8));

        let totals = today_totals(&[], &activities, Some(&s), date(1));
        assert!(totals.consumed.abs() < f64::EPSILON);
        assert!((totals.burned - 250.0).abs() < f64::EPSILON);
        assert!((totals.daily_goal - 2000.0).abs() < f64::EPSILON);
        // 2200 - 0 + 250
        assert!((totals.remaining - 2450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_totals_empty() {
        assert!(daily_totals(&[], &[], None).is_empty());
    }

    #[test]
    fn test_daily_totals_activity_only_date() {
        let s = settings();
        let activities = add_burned(Vec::new(), date(3), 400.0, at(8));

        let totals = daily_totals(&[], &activities, Some(&s));
        assert_eq!(totals.len(), 1);
        let day = &totals[&date(3)];
        assert!(day.consumed.abs() < f64::EPSILON);
        assert!((day.burned - 400.0).abs() < f64::EPSILON);
        assert!((day.daily_goal - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_totals_snapshot_beats_live_settings() {
        let s = settings();
        let entries = add_calories(Vec::new(), date(1), 1500.0, &s, at(8));

        let changed = Settings {
            daily_goal: 1600.0,
            daily_max: None,
            ..s
        };
        let totals = daily_totals(&entries, &[], Some(&changed));
        assert!((totals[&date(1)].daily_goal - 2000.0).abs() < f64::EPSILON);
        assert_eq!(totals[&date(1)].daily_max, Some(2200.0));
    }

    #[test]
    fn test_daily_totals_agrees_with_today_totals() {
        let s = settings();
        let today = date(5);
        let entries = add_calories(Vec::new(), today, 900.0, &s, at(8));
        let entries = add_calories(entries, date(4), 1700.0, &s, at(8));
        let activities = add_burned(Vec::new(), today, 150.0, at(9));

        let per_day = daily_totals(&entries, &activities, Some(&s));
        let today_only = today_totals(&entries, &activities, Some(&s), today);
        assert_eq!(per_day[&today], today_only);
    }
}
