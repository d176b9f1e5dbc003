// src/load.rs
//
// The aggregation engine: per-week loads from matter allocations plus
// leave, dashboard rows, and latest-entry-per-employee resolution. All of
// it is pure and recomputed on every read; nothing here is cached or
// persisted.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{Matter, MatterCategory, WeeklyEntry, HORIZON_WEEKS, WORKDAYS_PER_WEEK};
use crate::units::{
    clamp_capacity, clamp_week_load_percent, percent_to_hours, round_to_minute, round_whole,
};

// Fixed bucket thresholds, shared by every view.
pub const SEVERE_LOAD_PCT: i64 = 100;
pub const ELEVATED_LOAD_PCT: i64 = 80;
pub const MODERATE_LOAD_PCT: i64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBucket {
    Light,
    Moderate,
    Elevated,
    Severe,
}

impl LoadBucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Elevated => "elevated",
            Self::Severe => "severe",
        }
    }
}

pub fn bucket_for(load: i64) -> LoadBucket {
    if load >= SEVERE_LOAD_PCT {
        LoadBucket::Severe
    } else if load >= ELEVATED_LOAD_PCT {
        LoadBucket::Elevated
    } else if load >= MODERATE_LOAD_PCT {
        LoadBucket::Moderate
    } else {
        LoadBucket::Light
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryTotals {
    pub category1: usize,
    pub category2: usize,
    pub projects: usize,
}

pub fn matter_totals(matters: &[Matter]) -> CategoryTotals {
    let mut totals = CategoryTotals::default();
    for matter in matters {
        match matter.category {
            MatterCategory::Category1 => totals.category1 += 1,
            MatterCategory::Category2 => totals.category2 += 1,
            MatterCategory::Project => totals.projects += 1,
        }
    }
    totals
}

pub fn leave_day_count(entry: &WeeklyEntry, week: usize) -> usize {
    entry
        .annual_leave
        .get(week)
        .map(|days| days.iter().filter(|on| **on).count())
        .unwrap_or(0)
}

/// Raw week load as a percentage of a 40-hour week: matter allocations plus
/// the leave contribution (each leave day is a fifth of the week), at
/// canonical 3-decimal precision. This is the single source every display
/// derives from.
pub fn raw_week_load(entry: &WeeklyEntry, week: usize) -> Decimal {
    let matter_load: Decimal = entry
        .matters
        .iter()
        .map(|matter| matter.capacities.get(week).copied().unwrap_or_default())
        .sum();
    let leave_load = Decimal::from(leave_day_count(entry, week) as i64)
        / Decimal::from(WORKDAYS_PER_WEEK as i64)
        * dec!(100);
    clamp_capacity(matter_load + leave_load)
}

/// Whole-percent loads as the dashboard shows them, clamped to 0..=100 for
/// bucket classification. The raw figure above is allowed to exceed 100.
pub fn weekly_loads(entry: &WeeklyEntry) -> [i64; HORIZON_WEEKS] {
    std::array::from_fn(|week| clamp_week_load_percent(raw_week_load(entry, week)))
}

/// Hour total shown on the employee's own form for one week, derived from
/// the canonical percentage and snapped to whole minutes.
pub fn week_hours_total(entry: &WeeklyEntry, week: usize) -> Decimal {
    round_to_minute(percent_to_hours(raw_week_load(entry, week)))
}

/// One employee's derived dashboard row. Never stored; rebuilt from the
/// entry set on every read.
#[derive(Debug, Clone)]
pub struct DashboardRow {
    pub entry: WeeklyEntry,
    pub weekly_loads: [i64; HORIZON_WEEKS],
    pub average_load: i64,
    pub load_delta: i64,
    pub totals: CategoryTotals,
}

pub fn dashboard_row(entry: WeeklyEntry) -> DashboardRow {
    let weekly = weekly_loads(&entry);
    let sum: i64 = weekly.iter().sum();
    let average_load = round_whole(Decimal::from(sum) / Decimal::from(HORIZON_WEEKS as i64));
    DashboardRow {
        weekly_loads: weekly,
        average_load,
        load_delta: weekly[HORIZON_WEEKS - 1] - weekly[0],
        totals: matter_totals(&entry.matters),
        entry,
    }
}

pub fn dashboard_rows(entries: Vec<WeeklyEntry>) -> Vec<DashboardRow> {
    entries.into_iter().map(dashboard_row).collect()
}

/// Deduplication key for employee names: whitespace-trimmed and
/// case-insensitive, so "alice" and " Alice " collapse to one person.
pub fn employee_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Selects, per employee, the entry with the greatest week date; ties go to
/// the one written last. Deterministic regardless of input order. The result
/// is name-ordered so the hash-keyed store cannot leak iteration order into
/// the views.
pub fn latest_entries(db: &HashMap<String, WeeklyEntry>) -> Vec<WeeklyEntry> {
    let mut by_employee: HashMap<String, &WeeklyEntry> = HashMap::new();
    for entry in db.values() {
        let key = employee_key(&entry.employee_name);
        match by_employee.get(&key) {
            Some(existing) => {
                let newer = entry.week_date > existing.week_date
                    || (entry.week_date == existing.week_date
                        && entry.last_updated > existing.last_updated);
                if newer {
                    by_employee.insert(key, entry);
                }
            }
            None => {
                by_employee.insert(key, entry);
            }
        }
    }
    let mut entries: Vec<WeeklyEntry> = by_employee.into_values().cloned().collect();
    entries.sort_by(|a, b| {
        employee_key(&a.employee_name)
            .cmp(&employee_key(&b.employee_name))
            .then_with(|| a.employee_name.cmp(&b.employee_name))
    });
    entries
}

/// Latest entry for one employee, by the same date-then-timestamp rule.
pub fn latest_entry_for<'a>(
    name: &str,
    db: &'a HashMap<String, WeeklyEntry>,
) -> Option<&'a WeeklyEntry> {
    let key = employee_key(name);
    db.values()
        .filter(|entry| employee_key(&entry.employee_name) == key)
        .max_by(|a, b| {
            a.week_date
                .cmp(&b.week_date)
                .then(a.last_updated.cmp(&b.last_updated))
        })
}
