//! Request types for the Leave Converter API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::response::ApiError;
use crate::models::{Employee, LeaveTransaction, WeekdayHours};
use crate::roster::EmployeeUpdate;

/// Request body for the `/breakdown` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRequest {
    /// Leave transactions in upload order.
    pub transactions: Vec<LeaveTransaction>,
}

impl BreakdownRequest {
    /// Rejects transactions with a negative day count. Workbook uploads drop
    /// such rows during import; a JSON caller is told instead.
    pub fn validate(&self) -> Result<(), ApiError> {
        let Some((index, transaction)) = self
            .transactions
            .iter()
            .enumerate()
            .find(|(_, t)| t.number_of_days < Decimal::ZERO)
        else {
            return Ok(());
        };

        Err(ApiError::with_details(
            "VALIDATION_ERROR",
            format!(
                "transactions[{}]: number_of_days must not be negative (got {})",
                index, transaction.number_of_days
            ),
            format!("Employee {}", transaction.employee_id),
        ))
    }
}

/// Request body for the `/login` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

/// Request body for `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Employee number.
    pub id: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Weekday hours. Omitted days have no allotment.
    #[serde(default)]
    pub hours: WeekdayHours,
}

/// Request body for `PUT /employees/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdateRequest {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Weekday hours. Omitted days have no allotment.
    #[serde(default)]
    pub hours: WeekdayHours,
}

/// Query string for `GET /employees`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeQuery {
    /// Case-insensitive search over id and names.
    #[serde(default)]
    pub q: Option<String>,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            first_name: req.first_name,
            last_name: req.last_name,
            hours: req.hours,
        }
    }
}

impl From<EmployeeUpdateRequest> for EmployeeUpdate {
    fn from(req: EmployeeUpdateRequest) -> Self {
        EmployeeUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            hours: req.hours,
        }
    }
}
