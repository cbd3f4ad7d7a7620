//! Daily leave record model.
//!
//! This module contains the [`DailyLeaveRecord`] type produced by the
//! breakdown, one per employee per qualifying weekday.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Leave hours attributed to a single employee on a single weekday.
///
/// # Example
///
/// ```
/// use leave_converter::models::DailyLeaveRecord;
/// use chrono::{NaiveDate, Weekday};
/// use rust_decimal::Decimal;
///
/// let record = DailyLeaveRecord {
///     employee_id: "1001".to_string(),
///     employee_name: "Lovelace, Ada".to_string(),
///     initials: "A".to_string(),
///     leave_description: "Dentist".to_string(),
///     leave_type_description: "Sick Leave".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
///     day_of_week: Weekday::Mon,
///     daily_hours: Decimal::new(425, 2),
/// };
/// assert_eq!(record.day_name(), "Monday");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLeaveRecord {
    /// Employee number.
    pub employee_id: String,
    /// Employee name, copied from the transaction.
    pub employee_name: String,
    /// Employee initials, copied from the transaction.
    pub initials: String,
    /// Leave description, copied from the transaction.
    pub leave_description: String,
    /// Leave type, copied from the transaction.
    pub leave_type_description: String,
    /// The calendar date of leave.
    pub date: NaiveDate,
    /// The weekday of `date`, serialized as its full English name.
    #[serde(with = "weekday_name_serde")]
    pub day_of_week: Weekday,
    /// Leave hours for this date.
    pub daily_hours: Decimal,
}

impl DailyLeaveRecord {
    /// Full English name of the record's weekday.
    pub fn day_name(&self) -> &'static str {
        weekday_name(self.day_of_week)
    }
}

/// Returns the full English name for a weekday (e.g., "Wednesday").
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

mod weekday_name_serde {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::weekday_name(*weekday))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse::<Weekday>()
            .map_err(|_| serde::de::Error::custom(format!("unknown weekday '{}'", name)))
    }
}
