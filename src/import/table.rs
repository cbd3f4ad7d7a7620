//! Tabular normalization of leave uploads.
//!
//! This module turns an already-read grid of cells into leave transactions:
//! it resolves the header row, drops group-header and invalid rows, and
//! parses each remaining row. It has no knowledge of the workbook format.

use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::{debug, info};

use crate::config::ImportConfig;
use crate::error::{ConverterError, ConverterResult};
use crate::models::LeaveTransaction;

use super::columns::{ColumnMap, LeaveColumn};

/// Text date layouts accepted in date columns, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%b-%Y", "%d %b %Y"];

/// Text date-time layouts accepted in date columns; the time is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

static EMPTY_CELL: Cell = Cell::Empty;

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value.
    Empty,
    /// Text.
    Text(String),
    /// A number, including Excel date serials stored without a date format.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// A calendar date.
    Date(NaiveDate),
}

impl Cell {
    /// Returns true for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as trimmed text.
    ///
    /// Whole numbers render without a fractional part so numeric employee
    /// numbers match their roster identifiers.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(date) => date.to_string(),
        }
    }
}

/// A grid of cells read from the first worksheet, starting at the header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Zero-based sheet row of the header.
    pub header_row: usize,
    /// Header labels.
    pub headers: Vec<String>,
    /// Data rows following the header, in sheet order.
    pub rows: Vec<Vec<Cell>>,
}

/// The transactions read from an upload and how many rows were dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportResult {
    /// Leave transactions, in sheet order.
    pub transactions: Vec<LeaveTransaction>,
    /// Rows that were entirely blank.
    pub blank_rows: usize,
    /// Group header rows.
    pub sentinel_rows: usize,
    /// Rows whose number of days was missing or negative.
    pub invalid_day_rows: usize,
}

/// Converts a raw table into leave transactions.
///
/// # Behavior
///
/// - Headers are matched to canonical columns using the configured aliases
/// - Fully blank rows are dropped
/// - Rows whose employee number equals a configured sentinel are dropped
/// - Rows with a missing, non-numeric or negative number of days are dropped
/// - Dates must parse; an unreadable date is an error naming the sheet row
///
/// # Errors
///
/// - [`ConverterError::MissingColumns`] when a required column is absent
/// - [`ConverterError::InvalidCell`] when a kept row has an unreadable date
pub fn normalize_table(table: &RawTable, config: &ImportConfig) -> ConverterResult<ImportResult> {
    let columns = ColumnMap::resolve(&table.headers, &config.columns)?;
    let mut result = ImportResult::default();

    for (offset, row) in table.rows.iter().enumerate() {
        // 1-based sheet row, as shown by spreadsheet applications
        let row_number = table.header_row + offset + 2;
        let cell = |column: LeaveColumn| row.get(columns.position(column)).unwrap_or(&EMPTY_CELL);

        if row.iter().all(Cell::is_blank) {
            result.blank_rows += 1;
            continue;
        }

        let employee_id = cell(LeaveColumn::EmployeeId).to_text();
        if config.sentinel_rows.iter().any(|s| s.trim() == employee_id) {
            debug!(row = row_number, "Dropping group header row");
            result.sentinel_rows += 1;
            continue;
        }

        let number_of_days = match parse_days(cell(LeaveColumn::NumberOfDays)) {
            Some(days) if days >= Decimal::ZERO => days,
            _ => {
                debug!(row = row_number, employee_id = %employee_id, "Dropping row without valid day count");
                result.invalid_day_rows += 1;
                continue;
            }
        };

        result.transactions.push(LeaveTransaction {
            employee_id,
            employee_name: cell(LeaveColumn::EmployeeName).to_text(),
            initials: cell(LeaveColumn::Initials).to_text(),
            leave_description: cell(LeaveColumn::LeaveDescription).to_text(),
            leave_type_description: cell(LeaveColumn::LeaveTypeDescription).to_text(),
            start_date: parse_date(cell(LeaveColumn::StartDate), row_number, LeaveColumn::StartDate)?,
            end_date: parse_date(cell(LeaveColumn::EndDate), row_number, LeaveColumn::EndDate)?,
            number_of_days,
        });
    }

    info!(
        transactions = result.transactions.len(),
        blank_rows = result.blank_rows,
        sentinel_rows = result.sentinel_rows,
        invalid_day_rows = result.invalid_day_rows,
        "Normalized leave upload"
    );

    Ok(result)
}

fn parse_days(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) if n.is_finite() => Decimal::from_f64(*n).map(|d| d.normalize()),
        Cell::Text(text) => Decimal::from_str(text.trim()).ok(),
        _ => None,
    }
}

fn parse_date(cell: &Cell, row: usize, column: LeaveColumn) -> ConverterResult<NaiveDate> {
    let invalid = |message: String| ConverterError::InvalidCell {
        row,
        column: column.label().to_string(),
        message,
    };

    match cell {
        Cell::Date(date) => Ok(*date),
        Cell::Number(serial) => excel_serial_to_date(*serial)
            .ok_or_else(|| invalid(format!("date serial {} is out of range", serial))),
        Cell::Text(text) => {
            parse_date_text(text.trim()).ok_or_else(|| invalid(format!("unrecognised date '{}'", text.trim())))
        }
        Cell::Empty => Err(invalid("date is missing".to_string())),
        Cell::Bool(_) => Err(invalid("expected a date, found a boolean".to_string())),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
}

/// Converts an Excel 1900-system date serial to a calendar date.
///
/// The time-of-day fraction is discarded. Serials before 1 March 1900 are
/// rejected because Excel counts a non-existent 29 February 1900.
///
/// # Example
///
/// ```
/// use leave_converter::import::excel_serial_to_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(excel_serial_to_date(45810.0), NaiveDate::from_ymd_opt(2025, 6, 2));
/// ```
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 61.0 || serial > 2_958_465.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}
