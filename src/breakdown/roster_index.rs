//! Roster index construction.
//!
//! This module builds the employee-number lookup the expander consults for
//! every leave transaction.

use std::collections::HashMap;

use chrono::Weekday;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{Employee, WeekdayHours};

/// The roster data the expander needs for a single employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// The employee's first name.
    pub first_name: String,
    /// The employee's last name.
    pub last_name: String,
    /// Scheduled hours for each weekday.
    pub hours: WeekdayHours,
}

impl RosterEntry {
    /// Returns the configured hours for a weekday, or `None` on weekends and
    /// for days with no recorded allotment.
    pub fn hours_for(&self, weekday: Weekday) -> Option<Decimal> {
        self.hours.for_weekday(weekday)
    }
}

/// Lookup from employee number to [`RosterEntry`].
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    entries: HashMap<String, RosterEntry>,
}

impl RosterIndex {
    /// Builds an index from the employee collection.
    ///
    /// When an identifier appears more than once, the last record wins.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_converter::breakdown::RosterIndex;
    /// use leave_converter::models::{Employee, WeekdayHours};
    /// use rust_decimal::Decimal;
    ///
    /// let employees = vec![Employee {
    ///     id: "1001".to_string(),
    ///     first_name: "Ada".to_string(),
    ///     last_name: "Lovelace".to_string(),
    ///     hours: WeekdayHours::new([Decimal::new(8, 0); 5]),
    /// }];
    ///
    /// let index = RosterIndex::build(&employees);
    /// assert!(index.get("1001").is_some());
    /// assert!(index.get("9999").is_none());
    /// ```
    pub fn build(employees: &[Employee]) -> Self {
        let mut entries = HashMap::with_capacity(employees.len());

        for employee in employees {
            let entry = RosterEntry {
                first_name: employee.first_name.clone(),
                last_name: employee.last_name.clone(),
                hours: employee.hours,
            };
            if entries.insert(employee.id.clone(), entry).is_some() {
                debug!(employee_id = %employee.id, "Duplicate roster entry replaced");
            }
        }

        Self { entries }
    }

    /// Returns the entry for an employee number.
    pub fn get(&self, employee_id: &str) -> Option<&RosterEntry> {
        self.entries.get(employee_id)
    }

    /// Number of distinct employees in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index holds no employees.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
