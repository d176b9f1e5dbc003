// src/model.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// The rolling declaration horizon: 4 weeks of 5 working days.
pub const HORIZON_WEEKS: usize = 4;
pub const WORKDAYS_PER_WEEK: usize = 5;

pub const COMMENT_WORD_LIMIT: usize = 250;

pub type EntryKey = String;

/// The fixed 3-way matter classification. Free-text legacy values are mapped
/// onto these at the ingestion boundary (see `normalize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatterCategory {
    Category1,
    Category2,
    Project,
}

impl MatterCategory {
    /// Position in the persisted matter ordering: Category1 < Category2 < Project.
    pub fn sort_rank(self) -> u8 {
        match self {
            Self::Category1 => 0,
            Self::Category2 => 1,
            Self::Project => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Category1 => "Category1",
            Self::Category2 => "Category2",
            Self::Project => "Project",
        }
    }
}

impl fmt::Display for MatterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The employee's own two-week-ahead outlook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AvailabilityOutlook {
    #[default]
    #[serde(rename = "With Capacity")]
    WithCapacity,
    #[serde(rename = "Limited Capacity")]
    LimitedCapacity,
    #[serde(rename = "No Capacity")]
    NoCapacity,
    #[serde(rename = "Over Capacity")]
    OverCapacity,
}

impl AvailabilityOutlook {
    pub fn label(self) -> &'static str {
        match self {
            Self::WithCapacity => "With Capacity",
            Self::LimitedCapacity => "Limited Capacity",
            Self::NoCapacity => "No Capacity",
            Self::OverCapacity => "Over Capacity",
        }
    }
}

impl fmt::Display for AvailabilityOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One allocation line within an entry. `capacities` holds one
/// percentage-of-week value per horizon week, always 4 long, never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matter {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub category: MatterCategory,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub tasks: String,
    #[serde(default = "zero_capacities")]
    pub capacities: [Decimal; HORIZON_WEEKS],
}

/// One employee's declaration for the 4-week horizon starting at
/// `week_date` (a Monday). Persisted under the key `"<name>-<week_date>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEntry {
    pub week_date: NaiveDate,
    pub employee_name: String,
    #[serde(default)]
    pub office: String,
    #[serde(default)]
    pub mentor: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub interests: String,
    #[serde(default = "empty_leave_grid")]
    pub annual_leave: [[bool; WORKDAYS_PER_WEEK]; HORIZON_WEEKS],
    #[serde(rename = "availability2Weeks", alias = "selfAssessment", default)]
    pub availability: AvailabilityOutlook,
    #[serde(default = "empty_comments")]
    pub capacity_comments: [String; HORIZON_WEEKS],
    #[serde(rename = "projects", default)]
    pub matters: Vec<Matter>,
    #[serde(default = "epoch_timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl WeeklyEntry {
    /// Storage key: employee name and horizon start, joined exactly the way
    /// the persisted document keys them.
    pub fn key(&self) -> EntryKey {
        format!("{}-{}", self.employee_name, self.week_date)
    }
}

/// Roster record used by the sign-in boundary. Comparison is plain text by
/// design; see the settings surface for who can read these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub password: String,
}

pub fn zero_capacities() -> [Decimal; HORIZON_WEEKS] {
    [Decimal::ZERO; HORIZON_WEEKS]
}

pub fn empty_leave_grid() -> [[bool; WORKDAYS_PER_WEEK]; HORIZON_WEEKS] {
    [[false; WORKDAYS_PER_WEEK]; HORIZON_WEEKS]
}

pub fn empty_comments() -> [String; HORIZON_WEEKS] {
    std::array::from_fn(|_| String::new())
}

/// Fallback horizon start for records whose week date cannot be read: the
/// Monday of the Unix epoch week, which sorts behind every real submission.
pub fn epoch_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 5).expect("epoch monday is a valid date")
}

pub fn epoch_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}
