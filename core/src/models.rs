use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user's daily calorie limits. At most one instance exists; edits
/// overwrite it in place and `created_at` survives from first setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub daily_goal: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub daily_max: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// One day's accumulated calorie intake.
///
/// `daily_goal`/`daily_max` are a snapshot of the settings active when the
/// day was first logged, so historical days keep their original limits. A
/// `daily_goal` of `0.0` means the record predates the snapshot fields and
/// still needs backfilling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieEntry {
    pub id: String,
    pub date: NaiveDate,
    pub calories: f64,
    #[serde(default)]
    pub daily_goal: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub daily_max: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl CalorieEntry {
    /// Whether this record carries a goal snapshot.
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.daily_goal > 0.0
    }
}

/// One day's accumulated calories burned through activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub date: NaiveDate,
    pub calories_burned: f64,
    pub timestamp: DateTime<Utc>,
}

/// The latest weight measurement for a date. Logging again on the same
/// date replaces the value rather than accumulating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: String,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub timestamp: DateTime<Utc>,
}

/// Derived per-day totals. Never persisted; recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub consumed: f64,
    pub burned: f64,
    pub net: f64,
    pub daily_goal: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_max: Option<f64>,
    pub remaining: f64,
}

impl DailyTotals {
    /// The effective target is `daily_max` when set, else `daily_goal`;
    /// activity burned extends the remaining budget.
    #[must_use]
    pub fn compute(consumed: f64, burned: f64, daily_goal: f64, daily_max: Option<f64>) -> Self {
        let target = daily_max.unwrap_or(daily_goal);
        Self {
            consumed,
            burned,
            net: consumed - burned,
            daily_goal,
            daily_max,
            remaining: target - consumed + burned,
        }
    }
}

/// Generate an opaque unique record id. Collision resistance is the
/// contract, not the format.
#[must_use]
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

/// The canonical "current calendar day". All per-day bucketing keys off
/// dates produced here; core code never parses date strings from input.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn validate_goal(daily_goal: f64, daily_max: Option<f64>) -> Result<()> {
    if daily_goal <= 0.0 {
        bail!("Daily goal must be greater than 0");
    }
    if let Some(max) = daily_max {
        if max < daily_goal {
            bail!("Daily max ({max}) must be at least the daily goal ({daily_goal})");
        }
    }
    Ok(())
}

pub fn validate_burned(burned: f64) -> Result<()> {
    if burned < 0.0 {
        bail!("Calories burned must not be negative");
    }
    Ok(())
}

pub fn validate_weight(weight_kg: f64) -> Result<()> {
    if weight_kg <= 0.0 {
        bail!("Weight must be greater than 0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_goal_valid() {
        assert!(validate_goal(2000.0, None).is_ok());
        assert!(validate_goal(2000.0, Some(2200.0)).is_ok());
        assert!(validate_goal(2000.0, Some(2000.0)).is_ok());
    }

    #[test]
    fn test_validate_goal_zero_or_negative() {
        assert!(validate_goal(0.0, None).is_err());
        assert!(validate_goal(-100.0, None).is_err());
    }

    #[test]
    fn test_validate_goal_max_below_goal() {
        assert!(validate_goal(2000.0, Some(1800.0)).is_err());
    }

    #[test]
    fn test_validate_burned() {
        assert!(validate_burned(0.0).is_ok());
        assert!(validate_burned(300.0).is_ok());
        assert!(validate_burned(-1.0).is_err());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(75.0).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-5.0).is_err());
    }

    #[test]
    fn test_totals_compute_goal_only() {
        let t = DailyTotals::compute(1500.0, 200.0, 2000.0, None);
        assert!((t.net - 1300.0).abs() < f64::EPSILON);
        // 2000 - 1500 + 200 = 700
        assert!((t.remaining - 700.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_totals_compute_max_takes_precedence() {
        let t = DailyTotals::compute(1300.0, 300.0, 2000.0, Some(2200.0));
        assert!((t.net - 1000.0).abs() < f64::EPSILON);
        // 2200 - 1300 + 300 = 1200
        assert!((t.remaining - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_totals_compute_zeroed() {
        let t = DailyTotals::compute(0.0, 0.0, 0.0, None);
        assert!(t.consumed.abs() < f64::EPSILON);
        assert!(t.remaining.abs() < f64::EPSILON);
    }

    #[test]
    fn test_entry_ids_unique() {
        let a = new_entry_id();
        let b = new_entry_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_entry_without_snapshot_deserializes() {
        // Records written before the snapshot fields existed
        let json = r#"{
            "id": "abc",
            "date": "2024-01-01",
            "calories": 500.0,
            "timestamp": "2024-01-01T08:00:00Z"
        }"#;
        let entry: CalorieEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.has_snapshot());
        assert!(entry.daily_max.is_none());
    }
}
