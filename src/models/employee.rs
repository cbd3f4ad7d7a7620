//! Employee model and weekday hour allotments.
//!
//! This module defines the [`Employee`] roster entry and the
//! [`WeekdayHours`] allotment used to turn leave days into leave hours.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The scheduled working hours for each day of the working week.
///
/// A value of `Some(0)` means the employee does not work that day. A value of
/// `None` means no allotment was recorded, which the breakdown treats as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayHours {
    /// Hours scheduled on Monday.
    #[serde(default)]
    pub monday: Option<Decimal>,
    /// Hours scheduled on Tuesday.
    #[serde(default)]
    pub tuesday: Option<Decimal>,
    /// Hours scheduled on Wednesday.
    #[serde(default)]
    pub wednesday: Option<Decimal>,
    /// Hours scheduled on Thursday.
    #[serde(default)]
    pub thursday: Option<Decimal>,
    /// Hours scheduled on Friday.
    #[serde(default)]
    pub friday: Option<Decimal>,
}

impl WeekdayHours {
    /// Creates an allotment from five explicit values, Monday first.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_converter::models::WeekdayHours;
    /// use chrono::Weekday;
    /// use rust_decimal::Decimal;
    ///
    /// let hours = WeekdayHours::new([
    ///     Decimal::new(85, 1),
    ///     Decimal::new(85, 1),
    ///     Decimal::new(85, 1),
    ///     Decimal::new(85, 1),
    ///     Decimal::new(60, 1),
    /// ]);
    /// assert_eq!(hours.for_weekday(Weekday::Fri), Some(Decimal::new(60, 1)));
    /// assert_eq!(hours.for_weekday(Weekday::Sat), None);
    /// ```
    pub fn new(hours: [Decimal; 5]) -> Self {
        let [monday, tuesday, wednesday, thursday, friday] = hours.map(Some);
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
        }
    }

    /// Returns the allotment for a weekday.
    ///
    /// Saturday and Sunday have no allotment and always return `None`.
    pub fn for_weekday(&self, weekday: Weekday) -> Option<Decimal> {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    /// Returns `(weekday, hours)` pairs from Monday to Friday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, Option<Decimal>)> + '_ {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .map(move |day| (day, self.for_weekday(day)))
    }

    /// Sum of all recorded allotments, treating missing days as zero.
    pub fn weekly_total(&self) -> Decimal {
        self.iter().filter_map(|(_, hours)| hours).sum()
    }
}

/// Represents an employee on the leave roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee number, matched against the payroll export.
    pub id: String,
    /// The employee's first name.
    pub first_name: String,
    /// The employee's last name.
    pub last_name: String,
    /// Scheduled hours for each weekday.
    pub hours: WeekdayHours,
}

impl Employee {
    /// Returns "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee() -> Employee {
        Employee {
            id: "1001".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            hours: WeekdayHours::new([dec("8.5"), dec("8.5"), dec("8.5"), dec("8.5"), dec("6")]),
        }
    }

    #[test]
    fn test_deserialize_employee_with_string_hours() {
        let json = r#"{
            "id": "1001",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "hours": {
                "monday": "8.5",
                "tuesday": "8.5",
                "wednesday": "8.5",
                "thursday": "8.5",
                "friday": "6.0"
            }
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "1001");
        assert_eq!(employee.hours.monday, Some(dec("8.5")));
        assert_eq!(employee.hours.friday, Some(dec("6.0")));
    }

    #[test]
    fn test_missing_weekday_deserializes_as_none() {
        let json = r#"{
            "id": "1002",
            "first_name": "Grace",
            "last_name": "Hopper",
            "hours": { "monday": "7.6" }
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.hours.monday, Some(dec("7.6")));
        assert_eq!(employee.hours.tuesday, None);
        assert_eq!(employee.hours.friday, None);
    }

    #[test]
    fn test_for_weekday_maps_each_working_day() {
        let employee = create_test_employee();
        assert_eq!(employee.hours.for_weekday(Weekday::Mon), Some(dec("8.5")));
        assert_eq!(employee.hours.for_weekday(Weekday::Thu), Some(dec("8.5")));
        assert_eq!(employee.hours.for_weekday(Weekday::Fri), Some(dec("6")));
    }

    #[test]
    fn test_weekend_has_no_allotment() {
        let employee = create_test_employee();
        assert_eq!(employee.hours.for_weekday(Weekday::Sat), None);
        assert_eq!(employee.hours.for_weekday(Weekday::Sun), None);
    }

    #[test]
    fn test_weekly_total_skips_missing_days() {
        let mut hours = WeekdayHours::new([dec("8"), dec("8"), dec("8"), dec("8"), dec("6")]);
        assert_eq!(hours.weekly_total(), dec("38"));

        hours.wednesday = None;
        assert_eq!(hours.weekly_total(), dec("30"));
    }

    #[test]
    fn test_full_name_joins_first_and_last() {
        assert_eq!(create_test_employee().full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_serialize_employee_round_trip() {
        let employee = create_test_employee();
        let json = serde_json::to_string(&employee).unwrap();
        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }
}
