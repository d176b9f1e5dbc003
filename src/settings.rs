// src/settings.rs
//
// Configured lists (offices, mentors, languages) and the employee roster.
// Plain in-memory state injected into the views; removals are two-step so a
// cancelled confirmation is a true no-op.

use thiserror::Error;
use tracing::info;

use crate::model::Employee;

pub const INITIAL_OFFICES: [&str; 6] = [
    "Office A", "Office B", "Office C", "Office D", "Office E", "Office F",
];
pub const INITIAL_MENTORS: [&str; 4] = ["Mentor 1", "Mentor 2", "Mentor 3", "Mentor 4"];
pub const INITIAL_LANGUAGES: [&str; 7] = [
    "English", "French", "German", "Dutch", "Spanish", "Mandarin", "Arabic",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Name and password are required.")]
    MissingEmployeeFields,
    #[error("An employee with that name already exists.")]
    DuplicateEmployee,
    #[error("Password cannot be empty.")]
    EmptyPassword,
    #[error("No such employee: {0}")]
    UnknownEmployee(String),
}

/// A removal that has been requested but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRemoval {
    Office(String),
    Mentor(String),
    Language(String),
    Employee(String),
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub offices: Vec<String>,
    pub mentors: Vec<String>,
    pub languages: Vec<String>,
    pub employees: Vec<Employee>,
}

impl Default for AppSettings {
    fn default() -> Self {
        let employees = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|suffix| Employee {
                name: format!("Employee {}", suffix),
                password: "pass123".to_string(),
            })
            .collect();
        Self {
            offices: INITIAL_OFFICES.iter().map(|s| s.to_string()).collect(),
            mentors: INITIAL_MENTORS.iter().map(|s| s.to_string()).collect(),
            languages: INITIAL_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            employees,
        }
    }
}

fn add_list_item(list: &mut Vec<String>, item: &str) -> bool {
    let trimmed = item.trim();
    if trimmed.is_empty() || list.iter().any(|existing| existing == trimmed) {
        return false;
    }
    list.push(trimmed.to_string());
    true
}

fn remove_list_item(list: &mut Vec<String>, item: &str) -> bool {
    let before = list.len();
    list.retain(|existing| existing != item);
    list.len() != before
}

impl AppSettings {
    pub fn add_office(&mut self, name: &str) -> bool {
        add_list_item(&mut self.offices, name)
    }

    pub fn add_mentor(&mut self, name: &str) -> bool {
        add_list_item(&mut self.mentors, name)
    }

    pub fn add_language(&mut self, name: &str) -> bool {
        add_list_item(&mut self.languages, name)
    }

    pub fn add_employee(&mut self, name: &str, password: &str) -> Result<(), SettingsError> {
        let name = name.trim();
        let password = password.trim();
        if name.is_empty() || password.is_empty() {
            return Err(SettingsError::MissingEmployeeFields);
        }
        let duplicate = self
            .employees
            .iter()
            .any(|employee| employee.name.to_lowercase() == name.to_lowercase());
        if duplicate {
            return Err(SettingsError::DuplicateEmployee);
        }
        info!("Adding employee '{}'", name);
        self.employees.push(Employee {
            name: name.to_string(),
            password: password.to_string(),
        });
        Ok(())
    }

    pub fn set_employee_password(
        &mut self,
        name: &str,
        password: &str,
    ) -> Result<(), SettingsError> {
        let password = password.trim();
        if password.is_empty() {
            return Err(SettingsError::EmptyPassword);
        }
        match self
            .employees
            .iter_mut()
            .find(|employee| employee.name == name)
        {
            Some(employee) => {
                employee.password = password.to_string();
                Ok(())
            }
            None => Err(SettingsError::UnknownEmployee(name.to_string())),
        }
    }

    pub fn find_employee(&self, name: &str) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.name == name)
    }

    /// Applies a requested removal. Constructing a `PendingRemoval` is the
    /// request; dropping it unconfirmed cancels with no effect.
    pub fn confirm_removal(&mut self, pending: PendingRemoval) -> bool {
        let removed = match &pending {
            PendingRemoval::Office(name) => remove_list_item(&mut self.offices, name),
            PendingRemoval::Mentor(name) => remove_list_item(&mut self.mentors, name),
            PendingRemoval::Language(name) => remove_list_item(&mut self.languages, name),
            PendingRemoval::Employee(name) => {
                let before = self.employees.len();
                self.employees.retain(|employee| &employee.name != name);
                self.employees.len() != before
            }
        };
        if removed {
            info!("Removed {:?}", pending);
        }
        removed
    }
}
