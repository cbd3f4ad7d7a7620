//! Configuration types for the Leave Converter.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section and
//! field has a default, so a partial file only overrides what it names.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::import::LeaveColumn;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Leave workbook import settings.
    pub import: ImportConfig,
    /// Where repositories persist their data.
    pub storage: StorageConfig,
    /// Credential policy.
    pub auth: AuthConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

/// Leave workbook import settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Zero-based row index of the header row.
    pub header_row: usize,
    /// Zero-based index of the worksheet to read.
    pub sheet_index: usize,
    /// Employee-number cell values that mark group header rows.
    pub sentinel_rows: Vec<String>,
    /// Accepted header aliases for each canonical column.
    pub columns: ColumnAliases,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header_row: 7,
            sheet_index: 0,
            sentinel_rows: vec!["Group : All Groups".to_string()],
            columns: ColumnAliases::default(),
        }
    }
}

/// Accepted header aliases for each canonical leave column.
///
/// The canonical label of each column is always accepted in addition to the
/// aliases listed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnAliases(BTreeMap<LeaveColumn, Vec<String>>);

impl ColumnAliases {
    /// Creates an alias table from explicit entries.
    pub fn new(aliases: BTreeMap<LeaveColumn, Vec<String>>) -> Self {
        Self(aliases)
    }

    /// Returns the canonical label followed by the configured aliases.
    pub fn candidates(&self, column: LeaveColumn) -> Vec<&str> {
        let mut names = vec![column.label()];
        if let Some(aliases) = self.0.get(&column) {
            names.extend(aliases.iter().map(String::as_str));
        }
        names
    }
}

impl Default for ColumnAliases {
    fn default() -> Self {
        let table: [(LeaveColumn, &[&str]); 8] = [
            (
                LeaveColumn::EmployeeId,
                &["emp number", "employee number", "empnumber", "emp.number"],
            ),
            (
                LeaveColumn::EmployeeName,
                &["emp name", "name", "employeename", "emp. name"],
            ),
            (LeaveColumn::Initials, &["initial"]),
            (
                LeaveColumn::LeaveDescription,
                &["leavedescription", "description", "leave desc"],
            ),
            (
                LeaveColumn::LeaveTypeDescription,
                &["leave type", "leavetype", "type description", "leave type desc"],
            ),
            (
                LeaveColumn::StartDate,
                &["startdate", "from date", "date from", "start"],
            ),
            (
                LeaveColumn::EndDate,
                &["enddate", "to date", "date to", "end"],
            ),
            (
                LeaveColumn::NumberOfDays,
                &["nodays", "days", "number of days", "no. days"],
            ),
        ];

        Self(
            table
                .into_iter()
                .map(|(column, aliases)| {
                    (column, aliases.iter().map(|alias| alias.to_string()).collect())
                })
                .collect(),
        )
    }
}

/// Where repositories persist their data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the employee roster.
    pub employees_path: PathBuf,
    /// JSON file holding user accounts.
    pub users_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            employees_path: PathBuf::from("employee_data.json"),
            users_path: PathBuf::from("users.json"),
        }
    }
}

/// Credential policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Minimum accepted password length.
    pub min_password_length: usize,
    /// PBKDF2 iteration count for new hashes.
    pub pbkdf2_iterations: u32,
    /// Account seeded when the user store is empty.
    pub bootstrap_admin: BootstrapAdmin,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            pbkdf2_iterations: 120_000,
            bootstrap_admin: BootstrapAdmin::default(),
        }
    }
}

/// The initial administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapAdmin {
    /// Login name.
    pub username: String,
    /// Initial password. Should be changed after first login.
    pub password: String,
    /// Display name.
    pub full_name: String,
}

impl Default for BootstrapAdmin {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            full_name: "System Administrator".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}
