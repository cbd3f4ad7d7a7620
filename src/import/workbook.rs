//! Excel leave workbook reader.
//!
//! Reads the configured worksheet of a payroll leave export (.xlsx) into a
//! [`RawTable`] and hands it to [`normalize_table`].

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, ExcelDateTime, Range, Reader, Xlsx, open_workbook};
use chrono::NaiveDate;
use tracing::info;

use crate::config::ImportConfig;
use crate::error::{ConverterError, ConverterResult};

use super::table::{Cell, ImportResult, RawTable, normalize_table};

/// Reads leave transactions from an .xlsx file on disk.
///
/// # Errors
///
/// Returns [`ConverterError::Workbook`] if the file cannot be opened or the
/// worksheet is missing, and the errors of [`normalize_table`] otherwise.
pub fn read_leave_workbook<P: AsRef<Path>>(
    path: P,
    config: &ImportConfig,
) -> ConverterResult<ImportResult> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| ConverterError::Workbook {
        message: format!("Failed to open '{}': {}", path.display(), e),
    })?;

    info!(path = %path.display(), "Reading leave workbook");
    read_from(&mut workbook, config)
}

/// Reads leave transactions from an in-memory .xlsx upload.
pub fn read_leave_workbook_bytes(bytes: &[u8], config: &ImportConfig) -> ConverterResult<ImportResult> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).map_err(|e| ConverterError::Workbook {
        message: format!("Failed to open uploaded workbook: {}", e),
    })?;

    read_from(&mut workbook, config)
}

fn read_from<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    config: &ImportConfig,
) -> ConverterResult<ImportResult> {
    let range = workbook
        .worksheet_range_at(config.sheet_index)
        .ok_or_else(|| ConverterError::Workbook {
            message: format!("Workbook has no worksheet at index {}", config.sheet_index),
        })?
        .map_err(|e| ConverterError::Workbook {
            message: format!("Failed to read worksheet: {}", e),
        })?;

    let table = raw_table_from_range(&range, config.header_row);
    normalize_table(&table, config)
}

/// Copies the header row and everything below it out of a worksheet range.
///
/// Positions are absolute sheet coordinates, so a sheet whose used area
/// starts below row 1 still finds its header at the configured row.
fn raw_table_from_range(range: &Range<Data>, header_row: usize) -> RawTable {
    let (Some(_), Some((last_row, last_col))) = (range.start(), range.end()) else {
        return RawTable {
            header_row,
            ..RawTable::default()
        };
    };

    let width = last_col as usize + 1;
    let read_row = |row: usize| -> Vec<Cell> {
        (0..width)
            .map(|col| {
                range
                    .get_value((row as u32, col as u32))
                    .map(cell_from_data)
                    .unwrap_or(Cell::Empty)
            })
            .collect()
    };

    let headers = read_row(header_row).iter().map(Cell::to_text).collect();
    let rows = (header_row + 1..=last_row as usize).map(read_row).collect();

    RawTable {
        header_row,
        headers,
        rows,
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => date_from_excel_datetime(dt)
            .map(Cell::Date)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{:?}", e)),
    }
}

/// Calendar date of a typed date cell, honouring the workbook's 1900 or 1904
/// date system.
fn date_from_excel_datetime(dt: &ExcelDateTime) -> Option<NaiveDate> {
    let (year, month, day, ..) = dt.to_ymd_hms_milli();
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
}
