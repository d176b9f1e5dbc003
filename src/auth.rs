// src/auth.rs
//
// Sign-in boundary: three plaintext credential checks, one per access
// level. Deliberately unhardened; no lockout or rate limiting.

use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::settings::AppSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Employee(String),
    Management,
    Operations,
    It,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Employee(String),
    Management,
    Operations,
    It,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid Password")]
    InvalidEmployeePassword,
    #[error("Invalid Manager Password")]
    InvalidManagerPassword,
    #[error("Invalid Team Dashboard Password")]
    InvalidOperationsPassword,
    #[error("Invalid IT Password")]
    InvalidItPassword,
}

pub fn authenticate(
    role: &Role,
    password: &str,
    settings: &AppSettings,
    config: &AppConfig,
) -> Result<Session, AuthError> {
    match role {
        Role::It => {
            if password == config.it_master_password {
                info!("IT settings access granted");
                Ok(Session::It)
            } else {
                Err(AuthError::InvalidItPassword)
            }
        }
        Role::Management => {
            if password == config.admin_password {
                Ok(Session::Management)
            } else {
                Err(AuthError::InvalidManagerPassword)
            }
        }
        Role::Operations => {
            if password == config.admin_password {
                Ok(Session::Operations)
            } else {
                Err(AuthError::InvalidOperationsPassword)
            }
        }
        Role::Employee(name) => match settings.find_employee(name) {
            Some(employee) if employee.password == password => {
                info!("Employee '{}' signed in", employee.name);
                Ok(Session::Employee(employee.name.clone()))
            }
            _ => Err(AuthError::InvalidEmployeePassword),
        },
    }
}
