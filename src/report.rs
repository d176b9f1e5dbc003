// src/report.rs
//
// Plain-text rendering of the dashboard views plus the CSV export. All data
// comes in as already-computed rows; nothing here touches the store.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

use crate::dates::{all_leave_dates, format_display_date, week_labels, without_year};
use crate::insights::{top_matters_for_week, WeekInsights, WeekSummary, ROW_MATTERS_LIMIT};
use crate::load::{bucket_for, week_hours_total, DashboardRow};
use crate::model::{WeeklyEntry, HORIZON_WEEKS};
use crate::units::{format_hours, round_whole};

pub const RELATIVE_WEEK_LABELS: [&str; HORIZON_WEEKS] =
    ["This week", "Next week", "Week 3", "Week 4"];

/// The team capacity table for the rolling horizon starting at
/// `reference_week`.
pub fn render_dashboard(
    rows: &[DashboardRow],
    reference_week: NaiveDate,
    active_week: usize,
) -> String {
    let span_end = reference_week + Duration::days(25);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Employee Capacity Overview: {} to {}",
        format_display_date(reference_week),
        format_display_date(span_end)
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<20} {:<10} {:<18} {:>6} {:>6} {:>6} {:>6} {:>5} {:>5} {:>5}  {:<22} {}",
        "Employee",
        "Office",
        "Availability",
        "W1",
        "W2",
        "W3",
        "W4",
        "Cat1",
        "Cat2",
        "Proj",
        "Annual Leave",
        format!("Top Matters (Week {})", active_week + 1),
    );
    for row in rows {
        let matters = top_matters_for_week(&row.entry, active_week, ROW_MATTERS_LIMIT);
        let matter_cell = if matters.is_empty() {
            "-".to_string()
        } else {
            matters
                .iter()
                .map(|matter| {
                    let cap = matter
                        .capacities
                        .get(active_week)
                        .copied()
                        .unwrap_or_default();
                    let name = if matter.name.is_empty() {
                        "(Untitled)"
                    } else {
                        matter.name.as_str()
                    };
                    format!("{} {}%", name, round_whole(cap))
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(
            out,
            "{:<20} {:<10} {:<18} {:>5}% {:>5}% {:>5}% {:>5}% {:>5} {:>5} {:>5}  {:<22} {}",
            row.entry.employee_name,
            row.entry.office,
            row.entry.availability.label(),
            row.weekly_loads[0],
            row.weekly_loads[1],
            row.weekly_loads[2],
            row.weekly_loads[3],
            row.totals.category1,
            row.totals.category2,
            row.totals.projects,
            all_leave_dates(row.entry.week_date, &row.entry.annual_leave),
            matter_cell,
        );
    }
    out
}

pub fn render_insights(
    insights: &WeekInsights,
    summaries: &[WeekSummary; HORIZON_WEEKS],
    reference_week: NaiveDate,
    active_week: usize,
) -> String {
    let labels = week_labels(reference_week);
    let mut out = String::new();
    for (week_idx, summary) in summaries.iter().enumerate() {
        let marker = if week_idx == active_week { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {:<9} ({}): avg {}%, {} with capacity | {} at or over capacity, avg leave {} days",
            marker,
            RELATIVE_WEEK_LABELS[week_idx],
            without_year(&labels[week_idx]),
            summary.average_load,
            summary.with_capacity,
            summary.at_or_over_capacity,
            summary.average_leave_days,
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Active snapshot (Week {})", active_week + 1);
    let _ = writeln!(out, "  Average planned load: {}%", insights.average_load);
    let _ = writeln!(
        out,
        "  {} at capacity (80-99%) | {} over capacity (over 100%) | {} looking for work (below 80%)",
        insights.at_capacity, insights.over_capacity, insights.looking_for_work
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Busiest workload:");
    for person in &insights.busiest {
        let _ = writeln!(out, "  {:<20} {:>4}%", person.name, person.load);
    }
    let _ = writeln!(out, "Most available:");
    for person in &insights.most_available {
        let _ = writeln!(out, "  {:<20} {:>4}%", person.name, person.load);
    }
    let _ = writeln!(out, "Top matters by demand:");
    if insights.top_matters.is_empty() {
        let _ = writeln!(out, "  No scheduled load in this week.");
    }
    for matter in &insights.top_matters {
        let _ = writeln!(out, "  {:<30} {:>4}%", matter.name, matter.total);
    }
    out
}

/// One employee's latest declaration, week by week.
pub fn render_profile(entry: &WeeklyEntry) -> String {
    let labels = week_labels(entry.week_date);
    let loads = crate::load::weekly_loads(entry);
    let mut out = String::new();
    let _ = writeln!(out, "Employee Profile: {}", entry.employee_name);
    let _ = writeln!(
        out,
        "Office: {}    Mentor: {}",
        non_empty(&entry.office),
        non_empty(&entry.mentor)
    );
    let _ = writeln!(
        out,
        "Languages: {}    Status: {}",
        if entry.languages.is_empty() {
            "-".to_string()
        } else {
            entry.languages.join(" / ")
        },
        entry.availability.label()
    );
    let _ = writeln!(
        out,
        "Week commencing {}",
        format_display_date(entry.week_date)
    );
    let _ = writeln!(out);
    for week_idx in 0..HORIZON_WEEKS {
        let leave = crate::dates::format_leave_day_spans(&entry.annual_leave[week_idx]);
        let comment = entry.capacity_comments[week_idx].trim();
        let _ = writeln!(
            out,
            "Week {} ({}): load {:>3}% [{}] ({} hrs)  leave: {:<18} comments: {}",
            week_idx + 1,
            without_year(&labels[week_idx]),
            loads[week_idx],
            bucket_for(loads[week_idx]).label(),
            format_hours(week_hours_total(entry, week_idx)),
            leave,
            if comment.is_empty() { "-" } else { comment },
        );
    }
    let _ = writeln!(out);
    if entry.matters.is_empty() {
        let _ = writeln!(out, "Matters: none declared");
    } else {
        let _ = writeln!(out, "Matters:");
        for matter in &entry.matters {
            let caps = matter
                .capacities
                .iter()
                .map(|cap| format!("{}%", round_whole(*cap)))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "  [{}] {} - {} ({})",
                matter.category,
                non_empty(&matter.name),
                non_empty(&matter.owner),
                caps
            );
        }
    }
    let _ = writeln!(
        out,
        "Annual leave: {}",
        all_leave_dates(entry.week_date, &entry.annual_leave)
    );
    let _ = writeln!(out, "Interests: {}", non_empty(entry.interests.trim()));
    out
}

fn non_empty(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Writes the dashboard rows as CSV.
pub fn write_dashboard_csv(rows: &[DashboardRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Creating CSV export at {}", path.display()))?;
    writer
        .write_record([
            "Employee",
            "Office",
            "Availability Outlook",
            "Week 1 Load %",
            "Week 2 Load %",
            "Week 3 Load %",
            "Week 4 Load %",
            "Average Load %",
            "Load Delta",
            "Category1 Matters",
            "Category2 Matters",
            "Projects",
            "Annual Leave",
        ])
        .context("Writing CSV header")?;
    for row in rows {
        let record = vec![
            row.entry.employee_name.clone(),
            row.entry.office.clone(),
            row.entry.availability.label().to_string(),
            row.weekly_loads[0].to_string(),
            row.weekly_loads[1].to_string(),
            row.weekly_loads[2].to_string(),
            row.weekly_loads[3].to_string(),
            row.average_load.to_string(),
            row.load_delta.to_string(),
            row.totals.category1.to_string(),
            row.totals.category2.to_string(),
            row.totals.projects.to_string(),
            all_leave_dates(row.entry.week_date, &row.entry.annual_leave),
        ];
        writer
            .write_record(&record)
            .with_context(|| format!("Writing CSV row for '{}'", row.entry.employee_name))?;
    }
    writer.flush().context("Flushing CSV export")?;
    Ok(())
}
