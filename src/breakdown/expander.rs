//! Leave breakdown expansion.
//!
//! This module turns leave transactions into one [`DailyLeaveRecord`] per
//! employee per weekday of leave. Weekends never produce records.
//!
//! # Partial Days
//!
//! A transaction is a partial day when it starts and ends on the same date and
//! records less than one day of leave. Its single record carries
//! `number_of_days × configured hours`. Every other transaction uses the full
//! configured hours for each weekday in its range. A multi-day transaction's
//! `number_of_days` plays no part in the result.
//!
//! # Lenience
//!
//! Expansion never fails. Transactions for employees missing from the roster
//! are skipped and weekdays without a recorded allotment yield zero hours.

use std::collections::BTreeSet;

use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{DailyLeaveRecord, LeaveTransaction};

use super::RosterIndex;

/// Counts describing one expansion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownSummary {
    /// Transactions whose employee was found in the roster.
    pub transactions_processed: usize,
    /// Transactions skipped because their employee was not on the roster.
    pub transactions_skipped: usize,
    /// Distinct unmatched employee numbers, sorted.
    pub unmatched_employee_ids: Vec<String>,
    /// Number of daily records emitted.
    pub records_emitted: usize,
    /// Sum of `daily_hours` across all records.
    pub total_hours: Decimal,
}

/// The records produced by an expansion together with its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownResult {
    /// Daily records in transaction order, then ascending date.
    pub records: Vec<DailyLeaveRecord>,
    /// Counts describing the run.
    pub summary: BreakdownSummary,
}

/// Returns true when a transaction is a single date with less than one day of
/// leave.
///
/// # Example
///
/// ```
/// use leave_converter::breakdown::is_partial_day;
/// use leave_converter::models::LeaveTransaction;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
/// let transaction = LeaveTransaction {
///     employee_id: "1001".to_string(),
///     employee_name: "Lovelace, Ada".to_string(),
///     initials: "A".to_string(),
///     leave_description: "Dentist".to_string(),
///     leave_type_description: "Sick Leave".to_string(),
///     start_date: date,
///     end_date: date,
///     number_of_days: Decimal::new(5, 1),
/// };
/// assert!(is_partial_day(&transaction));
/// ```
pub fn is_partial_day(transaction: &LeaveTransaction) -> bool {
    transaction.is_single_day() && transaction.number_of_days < Decimal::ONE
}

/// Expands leave transactions into daily leave records.
///
/// See [`expand_leave_with_summary`] for the variant that also reports what
/// was skipped.
pub fn expand_leave(
    transactions: &[LeaveTransaction],
    roster: &RosterIndex,
) -> Vec<DailyLeaveRecord> {
    expand_leave_with_summary(transactions, roster).records
}

/// Expands leave transactions into daily leave records and summarises the run.
///
/// # Arguments
///
/// * `transactions` - Leave transactions in upload order
/// * `roster` - Index of employee weekday allotments
///
/// # Returns
///
/// A [`BreakdownResult`] whose records are grouped by transaction in input
/// order and sorted by ascending date within each transaction.
///
/// # Example
///
/// ```
/// use leave_converter::breakdown::{RosterIndex, expand_leave_with_summary};
/// use leave_converter::models::{Employee, LeaveTransaction, WeekdayHours};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let roster = RosterIndex::build(&[Employee {
///     id: "1001".to_string(),
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     hours: WeekdayHours::new([Decimal::new(8, 0); 5]),
/// }]);
///
/// // Friday to Monday spans a weekend
/// let transaction = LeaveTransaction {
///     employee_id: "1001".to_string(),
///     employee_name: "Lovelace, Ada".to_string(),
///     initials: "A".to_string(),
///     leave_description: "Long weekend".to_string(),
///     leave_type_description: "Annual Leave".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
///     number_of_days: Decimal::new(2, 0),
/// };
///
/// let result = expand_leave_with_summary(&[transaction], &roster);
/// assert_eq!(result.records.len(), 2);
/// assert_eq!(result.summary.total_hours, Decimal::new(16, 0));
/// ```
pub fn expand_leave_with_summary(
    transactions: &[LeaveTransaction],
    roster: &RosterIndex,
) -> BreakdownResult {
    let mut records = Vec::new();
    let mut transactions_processed = 0;
    let mut transactions_skipped = 0;
    let mut unmatched = BTreeSet::new();

    for transaction in transactions {
        let Some(entry) = roster.get(&transaction.employee_id) else {
            debug!(
                employee_id = %transaction.employee_id,
                start_date = %transaction.start_date,
                "Skipping leave for employee not on roster"
            );
            transactions_skipped += 1;
            unmatched.insert(transaction.employee_id.clone());
            continue;
        };
        transactions_processed += 1;

        let partial_day = is_partial_day(transaction);

        for date in transaction.dates() {
            let weekday = date.weekday();
            if matches!(weekday, Weekday::Sat | Weekday::Sun) {
                continue;
            }

            let daily_hours = daily_hours(
                entry.hours_for(weekday),
                transaction.number_of_days,
                partial_day,
            );

            records.push(DailyLeaveRecord {
                employee_id: transaction.employee_id.clone(),
                employee_name: transaction.employee_name.clone(),
                initials: transaction.initials.clone(),
                leave_description: transaction.leave_description.clone(),
                leave_type_description: transaction.leave_type_description.clone(),
                date,
                day_of_week: weekday,
                daily_hours,
            });
        }
    }

    let total_hours = records.iter().map(|record| record.daily_hours).sum();
    let summary = BreakdownSummary {
        transactions_processed,
        transactions_skipped,
        unmatched_employee_ids: unmatched.into_iter().collect(),
        records_emitted: records.len(),
        total_hours,
    };

    info!(
        transactions_processed = summary.transactions_processed,
        transactions_skipped = summary.transactions_skipped,
        records_emitted = summary.records_emitted,
        total_hours = %summary.total_hours,
        "Leave breakdown completed"
    );

    BreakdownResult { records, summary }
}

/// Hours for one qualifying weekday.
fn daily_hours(configured: Option<Decimal>, number_of_days: Decimal, partial_day: bool) -> Decimal {
    match configured {
        Some(hours) if partial_day => number_of_days * hours,
        Some(hours) => hours,
        None => Decimal::ZERO,
    }
}
