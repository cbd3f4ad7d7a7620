//! Leave transaction model.
//!
//! A [`LeaveTransaction`] is one approved leave row from the payroll export.
//! It lives for a single upload and is never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An approved leave request covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTransaction {
    /// Employee number, matched against the roster.
    pub employee_id: String,
    /// Employee name as exported by payroll.
    pub employee_name: String,
    /// Employee initials as exported by payroll.
    pub initials: String,
    /// Free-text leave description.
    pub leave_description: String,
    /// The leave type (e.g., "Annual Leave").
    pub leave_type_description: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Number of leave days recorded by payroll. May be fractional.
    pub number_of_days: Decimal,
}

impl LeaveTransaction {
    /// Iterates every calendar date from start to end inclusive.
    ///
    /// An inverted range yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_converter::models::LeaveTransaction;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let transaction = LeaveTransaction {
    ///     employee_id: "1001".to_string(),
    ///     employee_name: "Lovelace, Ada".to_string(),
    ///     initials: "A".to_string(),
    ///     leave_description: "Holiday".to_string(),
    ///     leave_type_description: "Annual Leave".to_string(),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
    ///     number_of_days: Decimal::new(2, 0),
    /// };
    /// assert_eq!(transaction.dates().count(), 4);
    /// ```
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |date| *date <= self.end_date)
    }

    /// Returns true when the leave starts and ends on the same day.
    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_transaction(start: &str, end: &str) -> LeaveTransaction {
        LeaveTransaction {
            employee_id: "1001".to_string(),
            employee_name: "Lovelace, Ada".to_string(),
            initials: "A".to_string(),
            leave_description: "Holiday".to_string(),
            leave_type_description: "Annual Leave".to_string(),
            start_date: make_date(start),
            end_date: make_date(end),
            number_of_days: Decimal::ONE,
        }
    }

    #[test]
    fn test_dates_are_inclusive_and_ascending() {
        let transaction = create_transaction("2025-12-29", "2026-01-02");
        let dates: Vec<NaiveDate> = transaction.dates().collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], make_date("2025-12-29"));
        assert_eq!(dates[4], make_date("2026-01-02"));
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_single_day_range_yields_one_date() {
        let transaction = create_transaction("2025-06-02", "2025-06-02");
        assert!(transaction.is_single_day());
        assert_eq!(transaction.dates().count(), 1);
    }

    #[test]
    fn test_inverted_range_yields_nothing() {
        let transaction = create_transaction("2025-06-09", "2025-06-06");
        assert!(!transaction.is_single_day());
        assert_eq!(transaction.dates().count(), 0);
    }

    #[test]
    fn test_deserialize_transaction() {
        let json = r#"{
            "employee_id": "1001",
            "employee_name": "Lovelace, Ada",
            "initials": "A",
            "leave_description": "Dentist",
            "leave_type_description": "Sick Leave",
            "start_date": "2025-06-02",
            "end_date": "2025-06-02",
            "number_of_days": "0.5"
        }"#;

        let transaction: LeaveTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.start_date, make_date("2025-06-02"));
        assert_eq!(transaction.number_of_days, Decimal::new(5, 1));
    }
}
