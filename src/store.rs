// src/store.rs
//
// One JSON document holding every weekly entry, keyed by
// "<employeeName>-<weekDate>". Read once at startup through the ingestion
// boundary, written in full on every change. A payload that cannot be
// parsed falls back to the seeded dataset instead of failing.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal_macros::dec;
use tokio::sync::Mutex as TokioMutex;
use tracing::{info, warn};

use crate::autosave::EntrySink;
use crate::model::{
    empty_comments, empty_leave_grid, AvailabilityOutlook, Matter, MatterCategory, WeeklyEntry,
};
use crate::normalize::{db_from_value, normalize_entry};

pub struct EntryStore {
    path: PathBuf,
    db: HashMap<String, WeeklyEntry>,
}

impl EntryStore {
    /// Opens the dataset at `path`. A missing or unreadable file and a
    /// corrupt payload both start from the seeded dataset.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let db = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => {
                    let db = db_from_value(&value);
                    info!("Loaded {} entries from {}", db.len(), path.display());
                    db
                }
                Err(err) => {
                    warn!(
                        "Could not parse {}: {}; starting from the seeded dataset",
                        path.display(),
                        err
                    );
                    seed_db()
                }
            },
            Err(err) => {
                info!(
                    "No readable dataset at {} ({}); starting from the seeded dataset",
                    path.display(),
                    err
                );
                seed_db()
            }
        };
        Self { path, db }
    }

    pub fn entries(&self) -> &HashMap<String, WeeklyEntry> {
        &self.db
    }

    pub fn get(&self, key: &str) -> Option<&WeeklyEntry> {
        self.db.get(key)
    }

    /// Upserts keyed by employee + week and writes the whole document back.
    /// Both explicit save and autosave come through here.
    pub fn upsert(&mut self, entry: WeeklyEntry) -> Result<WeeklyEntry> {
        self.upsert_at(entry, Utc::now())
    }

    pub fn upsert_at(&mut self, entry: WeeklyEntry, now: DateTime<Utc>) -> Result<WeeklyEntry> {
        let mut entry = normalize_entry(entry);
        entry.last_updated = now;
        let key = entry.key();
        info!("Upserting entry '{}'", key);
        self.db.insert(key, entry.clone());
        self.save()?;
        Ok(entry)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Creating dataset directory {}", parent.display()))?;
            }
        }
        let json =
            serde_json::to_string_pretty(&self.db).context("Serializing the capacity dataset")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Writing dataset to {}", self.path.display()))?;
        Ok(())
    }
}

/// Autosave's write path into a shared store.
pub struct StoreSink {
    store: Arc<TokioMutex<EntryStore>>,
}

impl StoreSink {
    pub fn new(store: Arc<TokioMutex<EntryStore>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntrySink for StoreSink {
    async fn persist(&self, entry: WeeklyEntry) -> Result<()> {
        self.store.lock().await.upsert(entry)?;
        Ok(())
    }
}

/// The dataset a fresh install starts from: two sample employees with
/// representative matters and leave, on the same horizon week.
pub fn seed_db() -> HashMap<String, WeeklyEntry> {
    let week = NaiveDate::from_ymd_opt(2026, 2, 2).expect("seed week is a valid date");
    let now = Utc::now();

    let first = WeeklyEntry {
        week_date: week,
        employee_name: "Employee A".to_string(),
        office: "Office A".to_string(),
        mentor: "Mentor 2".to_string(),
        languages: vec!["English".to_string(), "Spanish".to_string()],
        interests: String::new(),
        annual_leave: empty_leave_grid(),
        availability: AvailabilityOutlook::LimitedCapacity,
        capacity_comments: empty_comments(),
        matters: vec![
            Matter {
                id: "1".to_string(),
                name: "Task1".to_string(),
                category: MatterCategory::Category1,
                owner: "Supervisor 1".to_string(),
                tasks: String::new(),
                capacities: [dec!(25), dec!(25), dec!(20), dec!(10)],
            },
            Matter {
                id: "2".to_string(),
                name: "Task2".to_string(),
                category: MatterCategory::Category1,
                owner: "Supervisor 2".to_string(),
                tasks: String::new(),
                capacities: [dec!(20), dec!(20), dec!(15), dec!(10)],
            },
        ],
        last_updated: now,
    };

    let mut second_leave = empty_leave_grid();
    second_leave[0][0] = true;
    second_leave[3] = [true; 5];
    let second = WeeklyEntry {
        week_date: week,
        employee_name: "Employee B".to_string(),
        office: "Office E".to_string(),
        mentor: "Mentor 1".to_string(),
        languages: vec!["French".to_string()],
        interests: String::new(),
        annual_leave: second_leave,
        availability: AvailabilityOutlook::NoCapacity,
        capacity_comments: empty_comments(),
        matters: Vec::new(),
        last_updated: now,
    };

    let mut db = HashMap::new();
    db.insert(first.key(), first);
    db.insert(second.key(), second);
    db
}
