// src/normalize.rs
//
// Ingestion boundary for persisted records. Canonical documents take the
// strict serde path; anything older or damaged falls through to a
// field-by-field coercion that never fails. Both paths end in
// `normalize_entry`, which is idempotent because it runs on every load and
// every save.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use crate::dates::parse_iso_date;
use crate::model::{
    epoch_monday, epoch_timestamp, AvailabilityOutlook, Matter, MatterCategory, WeeklyEntry,
};
use crate::units::{capacity_from_f64, clamp_capacity, parse_capacity_input};

// Legacy spellings observed in stored records, mapped onto the canonical
// 3-way classification. Exact match after trimming.
static CATEGORY_ALIASES: Lazy<HashMap<&'static str, MatterCategory>> = Lazy::new(|| {
    HashMap::from([
        ("Category1", MatterCategory::Category1),
        ("Category2", MatterCategory::Category2),
        ("Project", MatterCategory::Project),
        ("Category 1", MatterCategory::Category1),
        ("Category 2", MatterCategory::Category2),
        ("Category A", MatterCategory::Category1),
        ("Category B", MatterCategory::Category2),
        ("Category C", MatterCategory::Project),
    ])
});

pub fn coerce_category(raw: Option<&str>) -> Option<MatterCategory> {
    raw.and_then(|value| CATEGORY_ALIASES.get(value.trim()).copied())
}

/// `category` wins if it maps; the legacy `matterType` field is consulted
/// next; anything else lands in the catch-all `Project` bucket.
pub fn resolve_category(category: Option<&str>, legacy: Option<&str>) -> MatterCategory {
    coerce_category(category)
        .or_else(|| coerce_category(legacy))
        .unwrap_or(MatterCategory::Project)
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn capacity_from_value(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(number)) => number
            .as_f64()
            .map(capacity_from_f64)
            .unwrap_or(Decimal::ZERO),
        Some(Value::String(text)) => parse_capacity_input(text),
        _ => Decimal::ZERO,
    }
}

fn matter_from_value(value: &Value) -> Matter {
    let category = resolve_category(
        value.get("category").and_then(Value::as_str),
        value.get("matterType").and_then(Value::as_str),
    );
    let raw_capacities = value.get("capacities").and_then(Value::as_array);
    let capacities =
        std::array::from_fn(|idx| capacity_from_value(raw_capacities.and_then(|caps| caps.get(idx))));
    Matter {
        id: string_field(value, "id"),
        name: string_field(value, "name"),
        category,
        owner: string_field(value, "owner"),
        tasks: string_field(value, "tasks"),
        capacities,
    }
}

fn availability_from_value(value: &Value) -> AvailabilityOutlook {
    let raw = value
        .get("availability2Weeks")
        .or_else(|| value.get("selfAssessment"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    match raw.trim() {
        "With Capacity" | "Open Capacity" => AvailabilityOutlook::WithCapacity,
        "Limited Capacity" => AvailabilityOutlook::LimitedCapacity,
        "No Capacity" | "At Capacity" => AvailabilityOutlook::NoCapacity,
        "Over Capacity" => AvailabilityOutlook::OverCapacity,
        _ => AvailabilityOutlook::default(),
    }
}

/// Reads one persisted record. Returns `None` only for values that are not
/// objects at all; every recognizable field of an object is kept and every
/// unrecognizable one is coerced to a safe default.
pub fn entry_from_value(value: &Value) -> Option<WeeklyEntry> {
    if !value.is_object() {
        return None;
    }
    if let Ok(entry) = serde_json::from_value::<WeeklyEntry>(value.clone()) {
        return Some(normalize_entry(entry));
    }

    // Lenient path for legacy or damaged records.
    let week_date = value
        .get("weekDate")
        .and_then(Value::as_str)
        .and_then(parse_iso_date)
        .unwrap_or_else(epoch_monday);
    let languages = value
        .get("languages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let annual_leave = std::array::from_fn(|week_idx| {
        std::array::from_fn(|day_idx| {
            value
                .get("annualLeave")
                .and_then(Value::as_array)
                .and_then(|weeks| weeks.get(week_idx))
                .and_then(Value::as_array)
                .and_then(|days| days.get(day_idx))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        })
    });
    let capacity_comments = std::array::from_fn(|idx| {
        value
            .get("capacityComments")
            .and_then(Value::as_array)
            .and_then(|comments| comments.get(idx))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    });
    let matters = value
        .get("projects")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| item.is_object())
                .map(matter_from_value)
                .collect()
        })
        .unwrap_or_default();
    let last_updated = value
        .get("lastUpdated")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<DateTime<Utc>>().ok())
        .unwrap_or_else(epoch_timestamp);

    Some(normalize_entry(WeeklyEntry {
        week_date,
        employee_name: string_field(value, "employeeName"),
        office: string_field(value, "office"),
        mentor: string_field(value, "mentor"),
        languages,
        interests: string_field(value, "interests"),
        annual_leave,
        availability: availability_from_value(value),
        capacity_comments,
        matters,
        last_updated,
    }))
}

pub fn normalize_matter(mut matter: Matter) -> Matter {
    for capacity in matter.capacities.iter_mut() {
        *capacity = clamp_capacity(*capacity);
    }
    matter
}

/// Canonicalizes a typed entry. Runs on every load and save; applying it
/// twice is the same as applying it once.
pub fn normalize_entry(mut entry: WeeklyEntry) -> WeeklyEntry {
    entry.matters = entry.matters.into_iter().map(normalize_matter).collect();
    entry
}

/// Reads the whole persisted document. Entries that are not objects are
/// dropped with a warning; the caller decides what an empty result means.
pub fn db_from_value(value: &Value) -> HashMap<String, WeeklyEntry> {
    let mut db = HashMap::new();
    let Some(map) = value.as_object() else {
        warn!("Persisted dataset is not an object; ignoring payload");
        return db;
    };
    for (key, raw_entry) in map {
        match entry_from_value(raw_entry) {
            Some(entry) => {
                db.insert(key.clone(), entry);
            }
            None => warn!("Skipping malformed entry under key '{}'", key),
        }
    }
    db
}
