//! Employee roster management.
//!
//! [`Roster`] validates and stores [`Employee`] records and builds the
//! [`RosterIndex`] the breakdown runs against.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::breakdown::RosterIndex;
use crate::error::{ConverterError, ConverterResult};
use crate::models::{Employee, WeekdayHours};
use crate::store::Repository;

/// The most hours an employee can be scheduled for on one day.
pub const MAX_DAILY_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Editable fields of an existing employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    /// New first name.
    pub first_name: String,
    /// New last name.
    pub last_name: String,
    /// New weekday hours.
    pub hours: WeekdayHours,
}

/// The employee roster.
#[derive(Clone)]
pub struct Roster {
    repository: Arc<dyn Repository<Employee>>,
}

impl Roster {
    /// Creates a roster over the given repository.
    pub fn new(repository: Arc<dyn Repository<Employee>>) -> Self {
        Self { repository }
    }

    /// Adds a new employee.
    ///
    /// # Errors
    ///
    /// - [`ConverterError::InvalidEmployee`] if a name or id is blank or an
    ///   allotment is outside 0-24 hours
    /// - [`ConverterError::DuplicateEmployee`] if the id is already used
    pub fn create(&self, employee: Employee) -> ConverterResult<Employee> {
        let employee = Employee {
            id: employee.id.trim().to_string(),
            first_name: employee.first_name.trim().to_string(),
            last_name: employee.last_name.trim().to_string(),
            hours: employee.hours,
        };
        require_non_blank("id", &employee.id)?;
        validate_fields(&employee.first_name, &employee.last_name, &employee.hours)?;

        if !self.repository.insert(employee.clone())? {
            return Err(ConverterError::DuplicateEmployee { id: employee.id });
        }
        info!(employee_id = %employee.id, "Employee added");
        Ok(employee)
    }

    /// Lists every employee.
    pub fn list(&self) -> ConverterResult<Vec<Employee>> {
        self.repository.list()
    }

    /// Fetches one employee.
    pub fn get(&self, id: &str) -> ConverterResult<Employee> {
        self.repository
            .get(id)?
            .ok_or_else(|| ConverterError::EmployeeNotFound { id: id.to_string() })
    }

    /// Case-insensitive substring search over id, first name and last name.
    pub fn search(&self, query: &str) -> ConverterResult<Vec<Employee>> {
        let needle = query.trim().to_lowercase();
        let employees = self.repository.list()?;
        if needle.is_empty() {
            return Ok(employees);
        }

        Ok(employees
            .into_iter()
            .filter(|e| {
                [&e.id, &e.first_name, &e.last_name]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Replaces an employee's names and weekday hours.
    pub fn update(&self, id: &str, update: EmployeeUpdate) -> ConverterResult<Employee> {
        let first_name = update.first_name.trim().to_string();
        let last_name = update.last_name.trim().to_string();
        validate_fields(&first_name, &last_name, &update.hours)?;

        let mut updated = None;
        self.repository.transact(&mut |employees: &mut Vec<Employee>| {
            let employee = employees
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| ConverterError::EmployeeNotFound { id: id.to_string() })?;
            employee.first_name = first_name.clone();
            employee.last_name = last_name.clone();
            employee.hours = update.hours;
            updated = Some(employee.clone());
            Ok(())
        })?;

        info!(employee_id = %id, "Employee updated");
        updated.ok_or_else(|| ConverterError::EmployeeNotFound { id: id.to_string() })
    }

    /// Removes an employee.
    pub fn delete(&self, id: &str) -> ConverterResult<()> {
        if !self.repository.delete(id)? {
            return Err(ConverterError::EmployeeNotFound { id: id.to_string() });
        }
        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    /// Builds the breakdown index from the current roster.
    pub fn index(&self) -> ConverterResult<RosterIndex> {
        Ok(RosterIndex::build(&self.repository.list()?))
    }
}

fn require_non_blank(field: &str, value: &str) -> ConverterResult<()> {
    if value.is_empty() {
        return Err(ConverterError::InvalidEmployee {
            field: field.to_string(),
            message: "must not be blank".to_string(),
        });
    }
    Ok(())
}

fn validate_fields(first_name: &str, last_name: &str, hours: &WeekdayHours) -> ConverterResult<()> {
    require_non_blank("first_name", first_name)?;
    require_non_blank("last_name", last_name)?;

    for (weekday, value) in hours.iter() {
        let Some(value) = value else {
            continue;
        };
        if value < Decimal::ZERO || value > MAX_DAILY_HOURS {
            return Err(ConverterError::InvalidEmployee {
                field: format!("hours.{}", weekday),
                message: format!("{} is outside 0-24 hours", value),
            });
        }
    }
    Ok(())
}
