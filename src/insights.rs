// src/insights.rs
//
// Ranking and insight queries over the deduplicated row set: top-N people
// and matters for a selected week, capacity bucket counts, the dashboard
// table sort, and the persisted matter ordering applied on save.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::load::{
    leave_day_count, DashboardRow, ELEVATED_LOAD_PCT, SEVERE_LOAD_PCT,
};
use crate::model::{Matter, WeeklyEntry, HORIZON_WEEKS};
use crate::units::{round_half_up, round_whole};

pub const TOP_PEOPLE_LIMIT: usize = 3;
pub const TOP_MATTERS_LIMIT: usize = 3;
pub const ROW_MATTERS_LIMIT: usize = 4;

const UNTITLED_MATTER: &str = "(Untitled)";

/// Case-insensitive comparison with a case-sensitive tiebreak, standing in
/// for the locale-aware ordering the tables use for string columns.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    match a.to_lowercase().cmp(&b.to_lowercase()) {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonLoad {
    pub name: String,
    pub load: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatterDemand {
    pub name: String,
    pub total: i64,
}

/// Snapshot for one selected week of the horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekInsights {
    pub average_load: i64,
    pub looking_for_work: usize,
    pub at_capacity: usize,
    pub over_capacity: usize,
    pub busiest: Vec<PersonLoad>,
    pub most_available: Vec<PersonLoad>,
    pub top_matters: Vec<MatterDemand>,
}

pub fn week_insights(rows: &[DashboardRow], week: usize) -> WeekInsights {
    let loads: Vec<i64> = rows
        .iter()
        .map(|row| row.weekly_loads.get(week).copied().unwrap_or(0))
        .collect();
    let average_load = if loads.is_empty() {
        0
    } else {
        round_whole(Decimal::from(loads.iter().sum::<i64>()) / Decimal::from(loads.len() as i64))
    };
    let looking_for_work = loads.iter().filter(|load| **load < ELEVATED_LOAD_PCT).count();
    let at_capacity = loads
        .iter()
        .filter(|load| (ELEVATED_LOAD_PCT..SEVERE_LOAD_PCT).contains(*load))
        .count();
    let over_capacity = loads.iter().filter(|load| **load >= SEVERE_LOAD_PCT).count();

    let ranked: Vec<PersonLoad> = rows
        .iter()
        .map(|row| PersonLoad {
            name: row.entry.employee_name.trim().to_string(),
            load: row.weekly_loads.get(week).copied().unwrap_or(0),
        })
        .collect();
    let mut busiest = ranked.clone();
    busiest.sort_by(|a, b| b.load.cmp(&a.load).then_with(|| locale_cmp(&a.name, &b.name)));
    busiest.truncate(TOP_PEOPLE_LIMIT);
    let mut most_available = ranked;
    most_available.sort_by(|a, b| a.load.cmp(&b.load).then_with(|| locale_cmp(&a.name, &b.name)));
    most_available.truncate(TOP_PEOPLE_LIMIT);

    // Demand is keyed by matter *name*: the same matter declared by several
    // people merges into one figure.
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for row in rows {
        for matter in &row.entry.matters {
            let load = matter.capacities.get(week).copied().unwrap_or_default();
            if load <= Decimal::ZERO {
                continue;
            }
            let key = if matter.name.is_empty() {
                UNTITLED_MATTER.to_string()
            } else {
                matter.name.clone()
            };
            *totals.entry(key).or_default() += load;
        }
    }
    let mut demand: Vec<(String, Decimal)> = totals.into_iter().collect();
    demand.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| locale_cmp(&a.0, &b.0)));
    let top_matters = demand
        .into_iter()
        .take(TOP_MATTERS_LIMIT)
        .map(|(name, total)| MatterDemand {
            name,
            total: round_whole(total),
        })
        .collect();

    WeekInsights {
        average_load,
        looking_for_work,
        at_capacity,
        over_capacity,
        busiest,
        most_available,
        top_matters,
    }
}

/// Per-week roll-up shown on the week selector cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSummary {
    pub average_load: i64,
    pub with_capacity: usize,
    pub at_or_over_capacity: usize,
    pub average_leave_days: Decimal,
}

pub fn weekly_summaries(rows: &[DashboardRow]) -> [WeekSummary; HORIZON_WEEKS] {
    std::array::from_fn(|week| {
        let loads: Vec<i64> = rows
            .iter()
            .map(|row| row.weekly_loads.get(week).copied().unwrap_or(0))
            .collect();
        let average_load = if loads.is_empty() {
            0
        } else {
            round_whole(
                Decimal::from(loads.iter().sum::<i64>()) / Decimal::from(loads.len() as i64),
            )
        };
        let with_capacity = loads.iter().filter(|load| **load < ELEVATED_LOAD_PCT).count();
        let at_or_over_capacity = loads.len() - with_capacity;
        let total_leave: usize = rows.iter().map(|row| leave_day_count(&row.entry, week)).sum();
        let average_leave_days = if rows.is_empty() {
            Decimal::ZERO
        } else {
            round_half_up(
                Decimal::from(total_leave as i64) / Decimal::from(rows.len() as i64),
                1,
            )
        };
        WeekSummary {
            average_load,
            with_capacity,
            at_or_over_capacity,
            average_leave_days,
        }
    })
}

/// The matters one entry contributes to a week, busiest first, capped for
/// the table cell.
pub fn top_matters_for_week(entry: &WeeklyEntry, week: usize, limit: usize) -> Vec<&Matter> {
    let mut matters: Vec<&Matter> = entry
        .matters
        .iter()
        .filter(|matter| matter.capacities.get(week).copied().unwrap_or_default() > Decimal::ZERO)
        .collect();
    matters.sort_by(|a, b| {
        b.capacities
            .get(week)
            .copied()
            .unwrap_or_default()
            .cmp(&a.capacities.get(week).copied().unwrap_or_default())
    });
    matters.truncate(limit);
    matters
}

// --- Table sort ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    EmployeeName,
    Office,
    Availability,
    WeekLoad(usize),
    Category1Total,
    Category2Total,
    ProjectTotal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Header-click semantics: a repeated click on the ascending key flips
    /// it to descending; anything else starts ascending on the new key.
    pub fn toggled(current: Option<SortConfig>, key: SortKey) -> SortConfig {
        match current {
            Some(config)
                if config.key == key && config.direction == SortDirection::Ascending =>
            {
                SortConfig {
                    key,
                    direction: SortDirection::Descending,
                }
            }
            _ => SortConfig {
                key,
                direction: SortDirection::Ascending,
            },
        }
    }
}

fn compare_rows(a: &DashboardRow, b: &DashboardRow, key: SortKey) -> Ordering {
    match key {
        SortKey::EmployeeName => locale_cmp(&a.entry.employee_name, &b.entry.employee_name),
        SortKey::Office => locale_cmp(&a.entry.office, &b.entry.office),
        SortKey::Availability => {
            locale_cmp(a.entry.availability.label(), b.entry.availability.label())
        }
        SortKey::WeekLoad(week) => a
            .weekly_loads
            .get(week)
            .copied()
            .unwrap_or(0)
            .cmp(&b.weekly_loads.get(week).copied().unwrap_or(0)),
        SortKey::Category1Total => a.totals.category1.cmp(&b.totals.category1),
        SortKey::Category2Total => a.totals.category2.cmp(&b.totals.category2),
        SortKey::ProjectTotal => a.totals.projects.cmp(&b.totals.projects),
    }
}

/// View-only table ordering. With no selection the table falls back to
/// descending by the active week's load.
pub fn sort_rows(rows: &mut [DashboardRow], sort: Option<SortConfig>, active_week: usize) {
    let applied = sort.unwrap_or(SortConfig {
        key: SortKey::WeekLoad(active_week),
        direction: SortDirection::Descending,
    });
    rows.sort_by(|a, b| {
        let ordering = compare_rows(a, b, applied.key);
        match applied.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

// --- Persisted matter ordering ---

fn compare_matters_for_save(a: &Matter, b: &Matter) -> Ordering {
    let by_category = a.category.sort_rank().cmp(&b.category.sort_rank());
    if by_category != Ordering::Equal {
        return by_category;
    }
    for week in 0..HORIZON_WEEKS {
        let by_week = b.capacities[week].cmp(&a.capacities[week]);
        if by_week != Ordering::Equal {
            return by_week;
        }
    }
    let total_a: Decimal = a.capacities.iter().copied().sum();
    let total_b: Decimal = b.capacities.iter().copied().sum();
    let by_total = total_b.cmp(&total_a);
    if by_total != Ordering::Equal {
        return by_total;
    }
    locale_cmp(&a.name, &b.name)
}

/// Ordering applied when an employee saves: category order, then descending
/// load week by week, then total load, then name. Unlike the table sort,
/// this changes the stored sequence.
pub fn sort_matters_for_save(matters: &mut [Matter]) {
    matters.sort_by(compare_matters_for_save);
}
