use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::aggregate;
use crate::maintenance;
use crate::models::{
    ActivityEntry, CalorieEntry, DailyTotals, Settings, WeightEntry, today, validate_burned,
    validate_goal, validate_weight,
};
use crate::store::Store;

/// What a maintenance pass changed.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceSummary {
    pub calorie_entries_merged: usize,
    pub activity_entries_merged: usize,
    pub snapshots_backfilled: usize,
}

impl MaintenanceSummary {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.calorie_entries_merged == 0
            && self.activity_entries_merged == 0
            && self.snapshots_backfilled == 0
    }
}

/// Orchestrates every logical operation as one scoped read → pure
/// transform → write round-trip against the store.
///
/// The round-trip is not transactional: two truly concurrent operations on
/// the same collection can lose an update. The design assumes a single
/// active session issuing one operation at a time.
pub struct Tracker {
    store: Store,
}

impl Tracker {
    pub fn open(path: &Path) -> Result<Self> {
        let store = Store::open(path)?;
        Ok(Self { store })
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Store::open_in_memory()?;
        Ok(Self { store })
    }

    // --- Settings ---

    /// Create or overwrite the user's daily limits. `created_at` survives
    /// from first setup across edits.
    pub fn set_goal(&self, daily_goal: f64, daily_max: Option<f64>) -> Result<Settings> {
        validate_goal(daily_goal, daily_max)?;
        let created_at = match self.store.load_settings()? {
            Some(existing) => existing.created_at,
            None => Utc::now(),
        };
        let settings = Settings {
            daily_goal,
            daily_max,
            created_at,
        };
        self.store.save_settings(&settings)?;
        Ok(settings)
    }

    pub fn settings(&self) -> Result<Option<Settings>> {
        self.store.load_settings()
    }

    // --- Calories ---

    /// Additively log calories for a date. Returns `None` without writing
    /// anything when no goal has been configured yet.
    pub fn log_calories(&self, date: NaiveDate, calories: f64) -> Result<Option<CalorieEntry>> {
        let Some(settings) = self.store.load_settings()? else {
            return Ok(None);
        };
        let entries = self.store.load_entries()?;
        let entries = aggregate::add_calories(entries, date, calories, &settings, Utc::now());
        self.store.save_entries(&entries)?;
        Ok(entries.into_iter().find(|e| e.date == date))
    }

    /// Replace a date's calorie total outright. Returns `None` when the
    /// entry does not exist and there are no settings to create it from.
    pub fn correct_calories(&self, date: NaiveDate, calories: f64) -> Result<Option<CalorieEntry>> {
        let settings = self.store.load_settings()?;
        let entries = self.store.load_entries()?;
        let entries = aggregate::set_calories(entries, date, calories, settings.as_ref(), Utc::now());
        self.store.save_entries(&entries)?;
        Ok(entries.into_iter().find(|e| e.date == date))
    }

    pub fn entries(&self) -> Result<Vec<CalorieEntry>> {
        self.store.load_entries()
    }

    // --- Activity ---

    pub fn log_activity(&self, date: NaiveDate, burned: f64) -> Result<ActivityEntry> {
        validate_burned(burned)?;
        let activities = self.store.load_activities()?;
        let activities = aggregate::add_burned(activities, date, burned, Utc::now());
        self.store.save_activities(&activities)?;
        Self::activity_for(activities, date)
    }

    pub fn correct_activity(&self, date: NaiveDate, burned: f64) -> Result<ActivityEntry> {
        validate_burned(burned)?;
        let activities = self.store.load_activities()?;
        let activities = aggregate::set_burned(activities, date, burned, Utc::now());
        self.store.save_activities(&activities)?;
        Self::activity_for(activities, date)
    }

    fn activity_for(activities: Vec<ActivityEntry>, date: NaiveDate) -> Result<ActivityEntry> {
        activities
            .into_iter()
            .find(|a| a.date == date)
            .ok_or_else(|| anyhow::anyhow!("Activity entry missing after upsert"))
    }

    // --- Weight ---

    pub fn log_weight(&self, date: NaiveDate, weight_kg: f64) -> Result<WeightEntry> {
        validate_weight(weight_kg)?;
        let weights = self.store.load_weights()?;
        let weights = aggregate::set_weight(weights, date, weight_kg, Utc::now());
        self.store.save_weights(&weights)?;
        weights
            .into_iter()
            .find(|w| w.date == date)
            .ok_or_else(|| anyhow::anyhow!("Weight entry missing after upsert"))
    }

    pub fn weight_on(&self, date: NaiveDate) -> Result<Option<WeightEntry>> {
        let weights = self.store.load_weights()?;
        Ok(weights.into_iter().find(|w| w.date == date))
    }

    /// Weight history, newest first, optionally limited.
    pub fn weight_history(&self, limit: Option<usize>) -> Result<Vec<WeightEntry>> {
        let mut weights = self.store.load_weights()?;
        weights.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(n) = limit {
            weights.truncate(n);
        }
        Ok(weights)
    }

    // --- Totals ---

    pub fn today_totals(&self) -> Result<DailyTotals> {
        let entries = self.store.load_entries()?;
        let activities = self.store.load_activities()?;
        let settings = self.store.load_settings()?;
        Ok(aggregate::today_totals(
            &entries,
            &activities,
            settings.as_ref(),
            today(),
        ))
    }

    pub fn daily_totals(&self) -> Result<BTreeMap<NaiveDate, DailyTotals>> {
        let entries = self.store.load_entries()?;
        let activities = self.store.load_activities()?;
        let settings = self.store.load_settings()?;
        Ok(aggregate::daily_totals(
            &entries,
            &activities,
            settings.as_ref(),
        ))
    }

    // --- Maintenance ---

    /// Consolidate past days and backfill missing goal snapshots.
    /// Collections that did not change are not rewritten.
    pub fn run_maintenance(&self) -> Result<MaintenanceSummary> {
        let entries = self.store.load_entries()?;
        let activities = self.store.load_activities()?;
        let settings = self.store.load_settings()?;

        let entries_before = entries.len();
        let activities_before = activities.len();

        let (entries, activities) = maintenance::consolidate_past_days(entries, activities, today());
        let (entries, stamped) = maintenance::backfill_goal_snapshots(entries, settings.as_ref());

        let summary = MaintenanceSummary {
            calorie_entries_merged: entries_before - entries.len(),
            activity_entries_merged: activities_before - activities.len(),
            snapshots_backfilled: stamped,
        };

        if summary.calorie_entries_merged > 0 || summary.snapshots_backfilled > 0 {
            self.store.save_entries(&entries)?;
        }
        if summary.activity_entries_merged > 0 {
            self.store.save_activities(&activities)?;
        }

        Ok(summary)
    }
}
