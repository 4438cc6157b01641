use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{ActivityEntry, CalorieEntry, Settings, WeightEntry};

pub const SETTINGS_KEY: &str = "settings";
pub const ENTRIES_KEY: &str = "entries";
pub const ACTIVITIES_KEY: &str = "activities";
pub const WEIGHTS_KEY: &str = "weights";

/// Durable key-value store holding whole record collections as JSON
/// documents. A write replaces the entire stored value for a key; there is
/// no partial or streaming access.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store: {}", path.display()))?;
        let store = Store { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS collections (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    /// Read the stored value for a key, or `None` if never written.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM collections WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt '{key}' collection in store"))?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Replace the entire stored value for a key. Failures propagate.
    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize '{key}' collection"))?;
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO collections (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, raw, now],
            )
            .with_context(|| format!("Failed to write '{key}' collection"))?;
        Ok(())
    }

    pub fn load_settings(&self) -> Result<Option<Settings>> {
        self.read(SETTINGS_KEY)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write(SETTINGS_KEY, settings)
    }

    pub fn load_entries(&self) -> Result<Vec<CalorieEntry>> {
        Ok(self.read(ENTRIES_KEY)?.unwrap_or_default())
    }

    pub fn save_entries(&self, entries: &[CalorieEntry]) -> Result<()> {
        self.write(ENTRIES_KEY, &entries)
    }

    pub fn load_activities(&self) -> Result<Vec<ActivityEntry>> {
        Ok(self.read(ACTIVITIES_KEY)?.unwrap_or_default())
    }

    pub fn save_activities(&self, activities: &[ActivityEntry]) -> Result<()> {
        self.write(ACTIVITIES_KEY, &activities)
    }

    pub fn load_weights(&self) -> Result<Vec<WeightEntry>> {
        Ok(self.read(WEIGHTS_KEY)?.unwrap_or_default())
    }

    pub fn save_weights(&self, weights: &[WeightEntry]) -> Result<()> {
        self.write(WEIGHTS_KEY, &weights)
    }
}
