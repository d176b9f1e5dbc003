// src/units.rs
//
// Conversions between the two ways a week's allocation is expressed: hours
// (what people type) and percent of a 40-hour week (what everything stores
// and aggregates). All arithmetic is Decimal so repeated edits round-trip
// without drift.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;

pub const HOURS_PER_WEEK: Decimal = dec!(40);
pub const PERCENT_SCALE: Decimal = dec!(100);

// Stored capacities carry at most 3 decimal places.
pub const CAPACITY_DECIMALS: u32 = 3;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D+").expect("non-digit pattern"));

/// Rounds half away from zero, matching the display rounding used across the
/// dashboard (banker's rounding would disagree on .5 boundaries).
pub fn round_half_up(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Canonical stored form of a week's allocation percentage: 3 decimal
/// places, never negative.
pub fn clamp_capacity(value: Decimal) -> Decimal {
    round_half_up(value, CAPACITY_DECIMALS).max(Decimal::ZERO)
}

/// Boundary conversion for values arriving as floats (legacy JSON numbers).
/// NaN and infinities collapse to zero.
pub fn capacity_from_f64(value: f64) -> Decimal {
    match Decimal::from_f64(value) {
        Some(decimal) => clamp_capacity(decimal),
        None => Decimal::ZERO,
    }
}

pub fn percent_to_hours(percent: Decimal) -> Decimal {
    (percent / PERCENT_SCALE * HOURS_PER_WEEK).max(Decimal::ZERO)
}

pub fn hours_to_percent(hours: Decimal) -> Decimal {
    clamp_capacity(hours / HOURS_PER_WEEK * PERCENT_SCALE)
}

/// Parses an hours cell: "H:MM", a plain decimal, or arbitrary text whose
/// digits are salvaged as a whole number. Never fails; never negative.
pub fn parse_hours_input(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some((raw_hours, raw_minutes)) = compact.split_once(':') {
        let hour_digits = NON_DIGITS.replace_all(raw_hours, "");
        let minute_digits = NON_DIGITS.replace_all(raw_minutes, "");
        if hour_digits.is_empty() && minute_digits.is_empty() {
            return Decimal::ZERO;
        }
        let hours = hour_digits.parse::<Decimal>().unwrap_or_default();
        let minutes = minute_digits.parse::<Decimal>().unwrap_or_default();
        return ((hours * dec!(60) + minutes) / dec!(60)).max(Decimal::ZERO);
    }

    if let Ok(value) = compact.parse::<Decimal>() {
        return value.max(Decimal::ZERO);
    }
    if let Ok(value) = Decimal::from_scientific(&compact) {
        return value.max(Decimal::ZERO);
    }
    let digits = NON_DIGITS.replace_all(&compact, "");
    if digits.is_empty() {
        return Decimal::ZERO;
    }
    digits.parse::<Decimal>().unwrap_or_default().max(Decimal::ZERO)
}

/// Formats fractional hours as "H:MM", snapped to the nearest whole minute.
pub fn format_hours(hours: Decimal) -> String {
    let total_minutes = round_half_up(hours * dec!(60), 0)
        .max(Decimal::ZERO)
        .to_i64()
        .unwrap_or(0);
    format!("{}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Snaps fractional hours to minute precision without formatting.
pub fn round_to_minute(hours: Decimal) -> Decimal {
    (round_half_up(hours * dec!(60), 0) / dec!(60)).max(Decimal::ZERO)
}

/// Parses a percentage cell typed as text. Only digit characters survive
/// (fractional text is not honored), leading zeros are stripped, and the
/// result is clamped like any other capacity.
pub fn parse_capacity_input(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    let digits = NON_DIGITS.replace_all(trimmed, "");
    if digits.is_empty() {
        return Decimal::ZERO;
    }
    let stripped = digits.trim_start_matches('0');
    let normalized = if stripped.is_empty() { "0" } else { stripped };
    clamp_capacity(normalized.parse::<Decimal>().unwrap_or_default())
}

pub fn round_whole(value: Decimal) -> i64 {
    round_half_up(value, 0).to_i64().unwrap_or(0)
}

/// Whole-percent week load as shown on the dashboard: rounded, then held to
/// the 0..=100 band used for bucket classification.
pub fn clamp_week_load_percent(value: Decimal) -> i64 {
    round_whole(value).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_and_hours_are_inverse_under_rounding() {
        for raw in ["0", "5.75", "8", "14.375", "40", "45.5"] {
            let hours: Decimal = raw.parse().unwrap();
            let round_tripped = percent_to_hours(hours_to_percent(hours));
            assert_eq!(
                round_to_minute(round_tripped),
                round_to_minute(hours),
                "hours {} should survive a percent round trip",
                raw
            );
        }
        for raw in ["0", "12.5", "45", "62.125", "100", "137.5"] {
            let percent: Decimal = raw.parse().unwrap();
            let round_tripped = hours_to_percent(percent_to_hours(percent));
            assert_eq!(
                round_tripped,
                clamp_capacity(percent),
                "percent {} should survive an hours round trip",
                raw
            );
        }
    }

    #[test]
    fn parse_hours_handles_colon_notation() {
        assert_eq!(parse_hours_input("5:45"), dec!(5.75));
        assert_eq!(parse_hours_input(":30"), dec!(0.5));
        assert_eq!(parse_hours_input("5:"), dec!(5));
        assert_eq!(parse_hours_input(" 2 : 15 "), dec!(2.25));
        assert_eq!(parse_hours_input("1:90"), dec!(2.5));
        assert_eq!(parse_hours_input(":"), Decimal::ZERO);
    }

    #[test]
    fn parse_hours_handles_plain_and_messy_text() {
        assert_eq!(parse_hours_input("7"), dec!(7));
        assert_eq!(parse_hours_input("7.5"), dec!(7.5));
        assert_eq!(parse_hours_input("3h"), dec!(3));
        assert_eq!(parse_hours_input("abc"), Decimal::ZERO);
        assert_eq!(parse_hours_input(""), Decimal::ZERO);
        assert_eq!(parse_hours_input("-3"), Decimal::ZERO);
    }

    #[test]
    fn format_hours_pads_minutes() {
        assert_eq!(format_hours(dec!(5.75)), "5:45");
        assert_eq!(format_hours(dec!(0)), "0:00");
        assert_eq!(format_hours(dec!(0.008)), "0:00");
        assert_eq!(format_hours(dec!(39.999)), "40:00");
        assert_eq!(format_hours(dec!(-2)), "0:00");
    }

    #[test]
    fn clamp_capacity_rounds_to_three_decimals_and_floors() {
        assert_eq!(clamp_capacity(dec!(12.34567)), dec!(12.346));
        assert_eq!(clamp_capacity(dec!(12.3455)), dec!(12.346));
        assert_eq!(clamp_capacity(dec!(-4)), Decimal::ZERO);
    }

    #[test]
    fn parse_capacity_salvages_digits_only() {
        assert_eq!(parse_capacity_input("45"), dec!(45));
        assert_eq!(parse_capacity_input("45%"), dec!(45));
        assert_eq!(parse_capacity_input("007"), dec!(7));
        assert_eq!(parse_capacity_input("000"), Decimal::ZERO);
        // Fractional text is deliberately not honored: digits run together.
        assert_eq!(parse_capacity_input("12.5"), dec!(125));
        assert_eq!(parse_capacity_input("abc"), Decimal::ZERO);
        assert_eq!(parse_capacity_input(""), Decimal::ZERO);
    }

    #[test]
    fn week_load_percent_clamps_to_band() {
        assert_eq!(clamp_week_load_percent(dec!(150)), 100);
        assert_eq!(clamp_week_load_percent(dec!(-5)), 0);
        assert_eq!(clamp_week_load_percent(dec!(49.5)), 50);
        assert_eq!(clamp_week_load_percent(dec!(64.4)), 64);
    }
}
