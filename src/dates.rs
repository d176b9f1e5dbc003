// src/dates.rs
//
// Week-label generation and leave-date range compression for the 4-week
// horizon. Labels use en dashes and full English month names; leave ranges
// use the short day/month forms shown on the dashboard.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::model::HORIZON_WEEKS;

// Day abbreviations used in leave spans (distinct from the column headers).
pub const DAY_SPAN_LABELS: [&str; 5] = ["Mon", "Tues", "Wed", "Thurs", "Fri"];

/// Parses "YYYY-MM-DD" with explicit integer and range validation before
/// falling back to chrono's generic date parsing. Local-time semantics: no
/// UTC conversion anywhere, so the day never shifts across timezones.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(3, '-');
    if let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) {
        if let (Ok(year), Ok(month), Ok(day)) =
            (y.parse::<i32>(), m.parse::<u32>(), d.parse::<u32>())
        {
            if (1..=12).contains(&month) && (1..=31).contains(&day) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    return Some(date);
                }
            }
        }
    }
    trimmed.parse::<NaiveDate>().ok()
}

/// Monday of the week containing `date`. Sunday counts as day 7 of the
/// previous week.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Monday of the current local week.
pub fn current_week_start() -> NaiveDate {
    week_start_for(Local::now().date_naive())
}

/// Four Monday–Friday labels, one per horizon week: "2–6 February 2026"
/// inside a month, "30 April – 4 May 2026" across a boundary.
pub fn week_labels(start: NaiveDate) -> [String; HORIZON_WEEKS] {
    std::array::from_fn(|week_idx| {
        let monday = start + Duration::days(7 * week_idx as i64);
        let friday = monday + Duration::days(4);
        if monday.month() == friday.month() {
            format!(
                "{}–{} {} {}",
                monday.day(),
                friday.day(),
                monday.format("%B"),
                friday.year()
            )
        } else {
            format!(
                "{} {} – {} {} {}",
                monday.day(),
                monday.format("%B"),
                friday.day(),
                friday.format("%B"),
                friday.year()
            )
        }
    })
}

/// Strips the trailing year from a week label for compact table headers.
pub fn without_year(label: &str) -> &str {
    match label.rfind(' ') {
        Some(idx)
            if label[idx + 1..].len() == 4
                && label[idx + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &label[..idx]
        }
        _ => label,
    }
}

/// "2 February 2026" for the week-commencing banner.
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), date.format("%B"), date.year())
}

/// Compresses one week's leave flags into comma-joined day ranges:
/// `[on, on, off, on, off]` becomes "Mon–Tues, Thurs". No leave is "-".
pub fn format_leave_day_spans(week_leave: &[bool]) -> String {
    let selected: Vec<usize> = week_leave
        .iter()
        .enumerate()
        .filter_map(|(idx, on)| on.then_some(idx))
        .collect();
    if selected.is_empty() {
        return "-".to_string();
    }

    let label = |idx: usize| -> String {
        DAY_SPAN_LABELS
            .get(idx)
            .map(|l| l.to_string())
            .unwrap_or_else(|| format!("Day {}", idx + 1))
    };
    let flush = |segments: &mut Vec<String>, start: usize, end: usize| {
        if start == end {
            segments.push(label(start));
        } else {
            segments.push(format!("{}–{}", label(start), label(end)));
        }
    };

    let mut segments = Vec::new();
    let mut range_start = selected[0];
    let mut range_end = selected[0];
    for &idx in &selected[1..] {
        if idx == range_end + 1 {
            range_end = idx;
            continue;
        }
        flush(&mut segments, range_start, range_end);
        range_start = idx;
        range_end = idx;
    }
    flush(&mut segments, range_start, range_end);

    segments.join(", ")
}

/// Expands the full leave grid to calendar dates and compresses them into
/// ranges grouped by month: "2–3, 23–27 Feb" or "30 Mar–3 Apr, 6 Apr".
/// A gap of more than one day breaks a range. No leave is "-".
pub fn all_leave_dates(
    start: NaiveDate,
    annual_leave: &[[bool; 5]; HORIZON_WEEKS],
) -> String {
    let mut dates = Vec::new();
    for (week_idx, week) in annual_leave.iter().enumerate() {
        for (day_idx, on) in week.iter().enumerate() {
            if *on {
                dates.push(start + Duration::days((week_idx * 7 + day_idx) as i64));
            }
        }
    }
    if dates.is_empty() {
        return "-".to_string();
    }
    dates.sort();

    let mut ranges: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for date in dates {
        match ranges.last_mut() {
            Some((_, end)) if date == *end + Duration::days(1) => *end = date,
            Some((_, end)) if date == *end => {}
            _ => ranges.push((date, date)),
        }
    }

    let flush_month = |parts: &mut Vec<String>, month_parts: &mut Vec<String>, label: &str| {
        if !month_parts.is_empty() {
            parts.push(format!("{} {}", month_parts.join(", "), label));
            month_parts.clear();
        }
    };

    let mut parts: Vec<String> = Vec::new();
    let mut month_parts: Vec<String> = Vec::new();
    let mut month_label = String::new();
    for (range_start, range_end) in ranges {
        let start_month = range_start.format("%b").to_string();
        let end_month = range_end.format("%b").to_string();

        if start_month != end_month {
            flush_month(&mut parts, &mut month_parts, &month_label);
            month_label.clear();
            parts.push(format!(
                "{} {}–{} {}",
                range_start.day(),
                start_month,
                range_end.day(),
                end_month
            ));
            continue;
        }

        if start_month != month_label {
            flush_month(&mut parts, &mut month_parts, &month_label);
            month_label = start_month;
        }
        if range_start == range_end {
            month_parts.push(range_start.day().to_string());
        } else {
            month_parts.push(format!("{}–{}", range_start.day(), range_end.day()));
        }
    }
    flush_month(&mut parts, &mut month_parts, &month_label);

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::empty_leave_grid;

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    #[test]
    fn parse_iso_date_validates_ranges() {
        assert_eq!(parse_iso_date("2026-02-02"), Some(d("2026-02-02")));
        assert_eq!(parse_iso_date(" 2026-02-02 "), Some(d("2026-02-02")));
        assert_eq!(parse_iso_date("2026-13-02"), None);
        assert_eq!(parse_iso_date("2026-00-10"), None);
        assert_eq!(parse_iso_date("2026-02-31"), None);
        assert_eq!(parse_iso_date("not a date"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn week_start_shifts_back_to_monday() {
        // Wednesday, Sunday and Monday of the same week.
        assert_eq!(week_start_for(d("2026-02-04")), d("2026-02-02"));
        assert_eq!(week_start_for(d("2026-02-08")), d("2026-02-02"));
        assert_eq!(week_start_for(d("2026-02-02")), d("2026-02-02"));
    }

    #[test]
    fn week_labels_within_one_month() {
        let labels = week_labels(d("2026-02-02"));
        assert_eq!(labels[0], "2–6 February 2026");
        assert_eq!(labels[1], "9–13 February 2026");
    }

    #[test]
    fn week_labels_across_month_boundary() {
        let labels = week_labels(d("2026-04-27"));
        assert_eq!(labels[0], "27 April – 1 May 2026");
        assert_eq!(labels[1], "4–8 May 2026");

        let boundary = week_labels(d("2026-04-30"));
        assert_eq!(boundary[0], "30 April – 4 May 2026");
    }

    #[test]
    fn without_year_strips_trailing_year_only() {
        assert_eq!(without_year("2–6 February 2026"), "2–6 February");
        assert_eq!(without_year("30 April – 4 May 2026"), "30 April – 4 May");
        assert_eq!(without_year("no year here"), "no year here");
    }

    #[test]
    fn leave_day_spans_compress_runs() {
        assert_eq!(
            format_leave_day_spans(&[true, true, false, true, false]),
            "Mon–Tues, Thurs"
        );
        assert_eq!(
            format_leave_day_spans(&[false, false, false, false, false]),
            "-"
        );
        assert_eq!(
            format_leave_day_spans(&[true, true, true, true, true]),
            "Mon–Fri"
        );
        assert_eq!(
            format_leave_day_spans(&[false, true, false, false, true]),
            "Tues, Fri"
        );
    }

    #[test]
    fn all_leave_dates_groups_by_month() {
        let mut leave = empty_leave_grid();
        leave[0][0] = true;
        leave[0][1] = true;
        leave[3] = [true; 5];
        assert_eq!(all_leave_dates(d("2026-02-02"), &leave), "2–3, 23–27 Feb");
    }

    #[test]
    fn all_leave_dates_handles_cross_month_ranges() {
        let mut leave = empty_leave_grid();
        leave[0] = [true; 5]; // 30 Mar – 3 Apr
        leave[1][0] = true; // 6 Apr
        assert_eq!(
            all_leave_dates(d("2026-03-30"), &leave),
            "30 Mar–3 Apr, 6 Apr"
        );
    }

    #[test]
    fn all_leave_dates_empty_grid_is_dash() {
        assert_eq!(all_leave_dates(d("2026-02-02"), &empty_leave_grid()), "-");
    }

    #[test]
    fn all_leave_dates_single_day() {
        let mut leave = empty_leave_grid();
        leave[1][2] = true; // Wednesday of week 2
        assert_eq!(all_leave_dates(d("2026-02-02"), &leave), "11 Feb");
    }
}
