//! Canonical leave columns and header resolution.
//!
//! Payroll exports label their columns inconsistently ("Emp. Number",
//! "Employee Number", "EMP NUMBER"). Headers and aliases are compared after
//! lowercasing and removing everything that is not a letter or digit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ColumnAliases;
use crate::error::{ConverterError, ConverterResult};

/// The columns every leave upload must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveColumn {
    /// Employee number.
    EmployeeId,
    /// Employee name.
    EmployeeName,
    /// Employee initials.
    Initials,
    /// Leave description.
    LeaveDescription,
    /// Leave type description.
    LeaveTypeDescription,
    /// First day of leave.
    StartDate,
    /// Last day of leave.
    EndDate,
    /// Number of leave days.
    NumberOfDays,
}

impl LeaveColumn {
    /// Every column, in export order.
    pub const ALL: [LeaveColumn; 8] = [
        LeaveColumn::EmployeeId,
        LeaveColumn::EmployeeName,
        LeaveColumn::Initials,
        LeaveColumn::LeaveDescription,
        LeaveColumn::LeaveTypeDescription,
        LeaveColumn::StartDate,
        LeaveColumn::EndDate,
        LeaveColumn::NumberOfDays,
    ];

    /// The canonical header label, as written by the payroll system.
    pub fn label(self) -> &'static str {
        match self {
            LeaveColumn::EmployeeId => "Emp. Number",
            LeaveColumn::EmployeeName => "Employee Name",
            LeaveColumn::Initials => "Initials",
            LeaveColumn::LeaveDescription => "Leave Description",
            LeaveColumn::LeaveTypeDescription => "Leave Type Description",
            LeaveColumn::StartDate => "Start Date",
            LeaveColumn::EndDate => "End Date",
            LeaveColumn::NumberOfDays => "No Days",
        }
    }
}

impl std::fmt::Display for LeaveColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reduces a header label to lowercase letters and digits.
///
/// # Example
///
/// ```
/// use leave_converter::import::normalize_label;
///
/// assert_eq!(normalize_label("  Emp. Number "), "empnumber");
/// assert_eq!(normalize_label("NO  DAYS"), "nodays");
/// ```
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Positions of each canonical column within an uploaded header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    positions: BTreeMap<LeaveColumn, usize>,
}

impl ColumnMap {
    /// Matches every canonical column against the header row.
    ///
    /// Candidates are tried in order: the canonical label first, then each
    /// alias. The first header that matches a candidate wins.
    ///
    /// # Errors
    ///
    /// Returns [`ConverterError::MissingColumns`] naming every column that
    /// could not be matched, together with the headers that were present.
    pub fn resolve(headers: &[String], aliases: &ColumnAliases) -> ConverterResult<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_label(h)).collect();
        let mut positions = BTreeMap::new();
        let mut missing = Vec::new();

        for column in LeaveColumn::ALL {
            let found = aliases.candidates(column).into_iter().find_map(|candidate| {
                let candidate = normalize_label(candidate);
                normalized.iter().position(|header| *header == candidate)
            });

            match found {
                Some(index) => {
                    debug!(column = %column, header = %headers[index], "Matched leave column");
                    positions.insert(column, index);
                }
                None => missing.push(column.label().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ConverterError::MissingColumns {
                missing,
                available: headers
                    .iter()
                    .filter(|h| !h.trim().is_empty())
                    .cloned()
                    .collect(),
            });
        }

        Ok(Self { positions })
    }

    /// Returns the header index of a canonical column.
    pub fn position(&self, column: LeaveColumn) -> usize {
        // Resolve guarantees every column is present
        self.positions.get(&column).copied().unwrap_or_default()
    }
}
