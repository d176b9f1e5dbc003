// src/form.rs
//
// One employee's editing session over their weekly entry: matter
// add/move/remove (removal is confirm-gated), hours-text capacity cells,
// leave toggles, word-limited free text, and the save gate that applies the
// persisted matter ordering.

use chrono::{NaiveDate, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::insights::sort_matters_for_save;
use crate::model::{
    empty_comments, empty_leave_grid, zero_capacities, AvailabilityOutlook, Matter,
    MatterCategory, WeeklyEntry, COMMENT_WORD_LIMIT, HORIZON_WEEKS,
};
use crate::normalize::normalize_entry;
use crate::settings::AppSettings;
use crate::units::{clamp_capacity, format_hours, hours_to_percent, parse_hours_input, percent_to_hours};
use crate::validation::{limit_word_count, required_field_issues};

pub const MATTER_ID_LEN: usize = 9;

fn generate_matter_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MATTER_ID_LEN)
        .map(char::from)
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Complete the required fields before saving.")]
pub struct SaveBlocked {
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct EntryForm {
    entry: WeeklyEntry,
    pending_removal: Option<String>,
}

impl EntryForm {
    /// Fresh entry for an employee with no record for the current week.
    pub fn new(user: &str, week_start: NaiveDate, settings: &AppSettings) -> Self {
        let entry = WeeklyEntry {
            week_date: week_start,
            employee_name: user.to_string(),
            office: settings.offices.first().cloned().unwrap_or_default(),
            mentor: String::new(),
            languages: vec!["English".to_string()],
            interests: String::new(),
            annual_leave: empty_leave_grid(),
            availability: AvailabilityOutlook::WithCapacity,
            capacity_comments: empty_comments(),
            matters: Vec::new(),
            last_updated: Utc::now(),
        };
        Self {
            entry,
            pending_removal: None,
        }
    }

    pub fn from_entry(entry: WeeklyEntry) -> Self {
        Self {
            entry: normalize_entry(entry),
            pending_removal: None,
        }
    }

    pub fn entry(&self) -> &WeeklyEntry {
        &self.entry
    }

    /// New matters land at the top of the list with an untouched shape.
    pub fn add_matter(&mut self) -> &Matter {
        let matter = Matter {
            id: generate_matter_id(),
            name: String::new(),
            category: MatterCategory::Project,
            owner: String::new(),
            tasks: String::new(),
            capacities: zero_capacities(),
        };
        self.entry.matters.insert(0, matter);
        &self.entry.matters[0]
    }

    // --- Confirm-gated removal ---

    pub fn request_remove_matter(&mut self, id: &str) -> bool {
        if self.entry.matters.iter().any(|matter| matter.id == id) {
            self.pending_removal = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn cancel_remove_matter(&mut self) {
        self.pending_removal = None;
    }

    pub fn confirm_remove_matter(&mut self) -> Option<Matter> {
        let id = self.pending_removal.take()?;
        let idx = self.entry.matters.iter().position(|matter| matter.id == id)?;
        Some(self.entry.matters.remove(idx))
    }

    pub fn move_matter(&mut self, id: &str, direction: MoveDirection) -> bool {
        let Some(idx) = self.entry.matters.iter().position(|matter| matter.id == id) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up => idx.checked_sub(1),
            MoveDirection::Down => (idx + 1 < self.entry.matters.len()).then_some(idx + 1),
        };
        let Some(target) = target else {
            return false;
        };
        self.entry.matters.swap(idx, target);
        true
    }

    fn matter_mut(&mut self, id: &str) -> Option<&mut Matter> {
        self.entry.matters.iter_mut().find(|matter| matter.id == id)
    }

    pub fn set_matter_name(&mut self, id: &str, name: &str) -> bool {
        match self.matter_mut(id) {
            Some(matter) => {
                matter.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_matter_owner(&mut self, id: &str, owner: &str) -> bool {
        match self.matter_mut(id) {
            Some(matter) => {
                matter.owner = owner.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_matter_category(&mut self, id: &str, category: MatterCategory) -> bool {
        match self.matter_mut(id) {
            Some(matter) => {
                matter.category = category;
                true
            }
            None => false,
        }
    }

    pub fn set_matter_tasks(&mut self, id: &str, tasks: &str) -> bool {
        let limited = limit_word_count(tasks, COMMENT_WORD_LIMIT);
        match self.matter_mut(id) {
            Some(matter) => {
                matter.tasks = limited;
                true
            }
            None => false,
        }
    }

    /// Capacity cells are edited as hours text ("5:45"); the stored value
    /// is the clamped percentage equivalent.
    pub fn set_capacity_hours(&mut self, id: &str, week: usize, raw: &str) -> bool {
        if week >= HORIZON_WEEKS {
            return false;
        }
        let percent = clamp_capacity(hours_to_percent(parse_hours_input(raw)));
        match self.matter_mut(id) {
            Some(matter) => {
                matter.capacities[week] = percent;
                true
            }
            None => false,
        }
    }

    /// What the hours cell reads back: the stored percentage as "H:MM".
    pub fn capacity_hours_text(&self, id: &str, week: usize) -> String {
        self.entry
            .matters
            .iter()
            .find(|matter| matter.id == id)
            .and_then(|matter| matter.capacities.get(week))
            .map(|pct| format_hours(percent_to_hours(*pct)))
            .unwrap_or_else(|| format_hours(Decimal::ZERO))
    }

    pub fn toggle_leave_day(&mut self, week: usize, day: usize) -> bool {
        match self
            .entry
            .annual_leave
            .get_mut(week)
            .and_then(|days| days.get_mut(day))
        {
            Some(flag) => {
                *flag = !*flag;
                true
            }
            None => false,
        }
    }

    pub fn set_comment(&mut self, week: usize, text: &str) -> bool {
        match self.entry.capacity_comments.get_mut(week) {
            Some(slot) => {
                *slot = limit_word_count(text, COMMENT_WORD_LIMIT);
                true
            }
            None => false,
        }
    }

    pub fn set_interests(&mut self, text: &str) {
        self.entry.interests = limit_word_count(text, COMMENT_WORD_LIMIT);
    }

    pub fn set_office(&mut self, office: &str) {
        self.entry.office = office.to_string();
    }

    pub fn set_mentor(&mut self, mentor: &str) {
        self.entry.mentor = mentor.to_string();
    }

    pub fn set_languages(&mut self, languages: Vec<String>) {
        self.entry.languages = languages;
    }

    pub fn set_availability(&mut self, availability: AvailabilityOutlook) {
        self.entry.availability = availability;
    }

    pub fn issues(&self) -> Vec<String> {
        required_field_issues(&self.entry)
    }

    /// Explicit save: the validation gate plus the persisted matter
    /// ordering. Autosave never calls this; it checks the same issue list
    /// and declines silently instead.
    pub fn finalize_for_save(&mut self) -> Result<WeeklyEntry, SaveBlocked> {
        let issues = self.issues();
        if !issues.is_empty() {
            return Err(SaveBlocked { issues });
        }
        sort_matters_for_save(&mut self.entry.matters);
        Ok(self.entry.clone())
    }
}
